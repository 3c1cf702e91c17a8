//! 布局外壳：固定侧边栏 + 顶栏 + 内容区

use serde::Serialize;

use super::router::{Route, Section};

pub const APP_TITLE: &str = "Ten Sports Race";
const ACCOUNT_LABEL: &str = "Admin User";

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    pub title: &'static str,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub account: &'static str,
    pub logout_action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutShell {
    pub sidebar: Sidebar,
    pub header: Header,
}

impl LayoutShell {
    /// 认证页面没有外壳
    pub fn for_route(route: &Route) -> Option<LayoutShell> {
        let section = route.section();
        if section == Section::Auth {
            return None;
        }

        let links = vec![
            NavLink {
                label: "Dashboard",
                href: "/dashboard",
                selected: section == Section::Dashboard,
            },
            NavLink {
                label: "E-commerce",
                href: "/dashboard/ecommerce",
                selected: section == Section::Ecommerce,
            },
            NavLink {
                label: "Participants",
                href: "/participants",
                selected: section == Section::Participants,
            },
        ];

        let title = match section {
            Section::Ecommerce => "Ecommerce",
            _ => "Dashboard",
        };

        Some(LayoutShell {
            sidebar: Sidebar {
                title: APP_TITLE,
                links,
            },
            header: Header {
                title,
                account: ACCOUNT_LABEL,
                logout_action: "/logout",
            },
        })
    }
}
