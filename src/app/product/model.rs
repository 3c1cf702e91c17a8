//! 商品数据模型

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::core::{
    error::CoreError,
    form::{require, FormModel},
};

pub const SIZE_OPTIONS: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];
pub const COLOR_OPTIONS: [&str; 6] = ["Red", "White", "Blue", "Green", "Black", "Yellow"];
pub const CATEGORY_OPTIONS: [&str; 3] = ["Shoes", "Clothing", "Accessories"];

/// 后端返回的商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_no: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub in_stock: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "labels")]
    pub sizes: Vec<String>,
    #[serde(default, deserialize_with = "labels")]
    pub colors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberRepr {
    fn as_f64(&self) -> f64 {
        match self {
            NumberRepr::Int(v) => *v as f64,
            NumberRepr::Float(v) => *v,
            NumberRepr::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<NumberRepr>::deserialize(deserializer)?;
    Ok(value.map(|v| v.as_f64()).filter(|v| v.is_finite()).unwrap_or(0.0))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<NumberRepr>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberRepr::Int(v)) => v,
        Some(other) => {
            let v = other.as_f64();
            if v.is_finite() {
                v.trunc() as i64
            } else {
                0
            }
        }
        None => 0,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelsRepr {
    List(Vec<String>),
    Joined(String),
}

/// 尺码、颜色：数组或逗号分隔的字符串都接受
fn labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<LabelsRepr>::deserialize(deserializer)?;
    let raw = match value {
        Some(LabelsRepr::List(list)) => list,
        Some(LabelsRepr::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(clean_labels(raw))
}

/// 去空白、去空值、去重（保留首次出现的顺序）
pub fn clean_labels(raw: Vec<String>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(raw.len());
    for label in raw {
        let label = label.trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// 表单输入既可以是字符串也可以是数字
fn text_input<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Input {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Input>::deserialize(deserializer)? {
        Some(Input::Text(s)) => s,
        Some(Input::Int(v)) => v.to_string(),
        Some(Input::Float(v)) => v.to_string(),
        None => String::new(),
    })
}

/// 新增/编辑商品表单，数值字段保持原始输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductForm {
    pub product_name: String,
    pub category: String,
    #[serde(deserialize_with = "text_input")]
    pub price: String,
    #[serde(deserialize_with = "text_input")]
    pub product_no: String,
    #[serde(deserialize_with = "text_input")]
    pub in_stock: String,
    #[serde(deserialize_with = "text_input")]
    pub stock_quantity: String,
    #[serde(deserialize_with = "labels")]
    pub sizes: Vec<String>,
    #[serde(deserialize_with = "labels")]
    pub colors: Vec<String>,
    pub description: String,
    pub image: String,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            product_name: product.product_name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            product_no: product.product_no.to_string(),
            in_stock: product.in_stock.to_string(),
            stock_quantity: product.stock_quantity.to_string(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
        }
    }
}

/// 提交给后端的完整商品
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub product_name: String,
    pub category: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "Product number must not be negative"))]
    pub product_no: i64,
    #[validate(range(min = 0, message = "In stock must not be negative"))]
    pub in_stock: i64,
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: i64,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub description: String,
    pub image: String,
}

fn parse_decimal(input: &str, label: &str) -> Result<f64, CoreError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoreError::Validation(format!("{label} must be a number")))
}

fn parse_whole(input: &str, label: &str) -> Result<i64, CoreError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| CoreError::Validation(format!("{label} must be a whole number")))
}

impl FormModel for ProductForm {
    type Payload = ProductPayload;

    fn to_payload(&self) -> Result<ProductPayload, CoreError> {
        require(&[
            (&self.product_name, "Product name"),
            (&self.category, "Category"),
            (&self.price, "Price"),
            (&self.product_no, "Product number"),
            (&self.in_stock, "In stock"),
            (&self.stock_quantity, "Stock quantity"),
        ])?;

        let payload = ProductPayload {
            product_name: self.product_name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: parse_decimal(&self.price, "Price")?,
            product_no: parse_whole(&self.product_no, "Product number")?,
            in_stock: parse_whole(&self.in_stock, "In stock")?,
            stock_quantity: parse_whole(&self.stock_quantity, "Stock quantity")?,
            sizes: clean_labels(self.sizes.clone()),
            colors: clean_labels(self.colors.clone()),
            description: self.description.trim().to_string(),
            image: self.image.clone(),
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// 局部更新（按行提交的尺码/颜色）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.sizes.is_none() && self.colors.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    In,
    Out,
}

impl StockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAction::In => "in",
            StockAction::Out => "out",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            StockAction::In => "Stock increased",
            StockAction::Out => "Stock decreased",
        }
    }
}

/// 库存调整请求
#[derive(Debug, Clone, Deserialize)]
pub struct StockAdjustment {
    pub action: StockAction,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl StockAdjustment {
    /// 数量至少为 1；出库数量不能超过已知库存
    pub fn check(&self, known_in_stock: Option<i64>) -> Result<(), CoreError> {
        if self.quantity < 1 {
            return Err(CoreError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        if let (StockAction::Out, Some(in_stock)) = (self.action, known_in_stock) {
            if self.quantity > in_stock {
                return Err(CoreError::Validation(format!(
                    "Cannot remove {} units, only {} in stock",
                    self.quantity, in_stock
                )));
            }
        }
        Ok(())
    }
}

/// 库存接口返回的最新库存
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevels {
    #[serde(default)]
    pub in_stock: Option<i64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}
