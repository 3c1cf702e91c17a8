//! 日志基础设施

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化日志
    ///
    /// `RUST_LOG` 优先于配置里的级别。配置了日志目录时额外按天滚动写文件，
    /// 返回的 guard 需要在进程退出前一直持有。
    pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

        let (file_layer, guard) = match &config.log_dir {
            Some(dir) => {
                let appender = rolling::daily(dir, &config.file_prefix);
                let (writer, guard) = non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            None => (None, None),
        };

        // 测试里可能重复初始化，忽略已存在的全局订阅者
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .with(file_layer)
            .try_init();

        guard
    }
}
