//! 商品列表、库存管理视图与按行的尺码/颜色选择

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::{clean_labels, Product, ProductPatch, StockLevels};

/// 已加载的商品集合
#[derive(Debug, Default)]
pub struct ProductListView {
    products: Vec<Product>,
    loaded: bool,
}

/// 列表过滤参数
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProductFilter {
    /// 没有任何过滤参数，即进入页面
    pub fn is_mount(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }

    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "All")
    }

    pub fn matches(&self, product: &Product) -> bool {
        let text = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        let text_ok = text.is_empty()
            || product.product_name.to_lowercase().contains(&text)
            || product.category.to_lowercase().contains(&text);
        let category_ok = self.category().map_or(true, |c| product.category == c);
        text_ok && category_ok
    }
}

impl ProductListView {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loaded = true;
    }

    /// 数据已变更，下次访问列表时重新拉取
    pub fn invalidate(&mut self) {
        self.loaded = false;
    }

    /// 退出登录后丢弃缓存
    pub fn clear(&mut self) {
        self.products.clear();
        self.loaded = false;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn filtered(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// 去重后的分类，按首次出现的顺序
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !product.category.is_empty() && !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    /// 用接口返回的库存更新一行，没有返回数据时返回 false
    pub fn apply_stock_levels(&mut self, id: &str, levels: &StockLevels) -> bool {
        if levels.in_stock.is_none() && levels.stock_quantity.is_none() {
            return false;
        }
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                if let Some(in_stock) = levels.in_stock {
                    product.in_stock = in_stock;
                }
                if let Some(quantity) = levels.stock_quantity {
                    product.stock_quantity = quantity;
                }
                true
            }
            None => false,
        }
    }
}

/// 库存管理视图模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMode {
    /// 有库存的商品
    #[default]
    In,
    /// 已售罄的商品
    Out,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockQuery {
    pub mode: Option<StockMode>,
    pub category: Option<String>,
}

impl StockQuery {
    pub fn is_mount(&self) -> bool {
        self.mode.is_none() && self.category.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockSummary {
    pub mode: StockMode,
    pub category: String,
    pub categories: Vec<String>,
    pub rows: Vec<Product>,
    pub total_current_stock: i64,
}

impl StockSummary {
    pub fn build(view: &ProductListView, query: &StockQuery) -> Self {
        let mode = query.mode.unwrap_or_default();
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("All")
            .to_string();

        let rows: Vec<Product> = view
            .products()
            .iter()
            .filter(|p| match mode {
                StockMode::In => p.in_stock > 0,
                StockMode::Out => p.in_stock == 0,
            })
            .filter(|p| category == "All" || p.category == category)
            .cloned()
            .collect();
        let total_current_stock = rows.iter().map(|p| p.in_stock).sum();

        Self {
            mode,
            category,
            categories: view.categories(),
            rows,
            total_current_stock,
        }
    }
}

/// 单行的尺码/颜色选择
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantSelection {
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
}

/// 按商品 ID 保存的选择
#[derive(Debug, Default, Serialize)]
pub struct VariantSelections {
    rows: HashMap<String, VariantSelection>,
}

impl VariantSelections {
    /// 合并一行的选择，未给出的字段保留之前的值
    pub fn select(&mut self, id: &str, selection: VariantSelection) {
        let row = self.rows.entry(id.to_string()).or_default();
        if let Some(sizes) = selection.sizes {
            row.sizes = Some(clean_labels(sizes));
        }
        if let Some(colors) = selection.colors {
            row.colors = Some(clean_labels(colors));
        }
    }

    pub fn patch_for(&self, id: &str) -> ProductPatch {
        self.rows
            .get(id)
            .map(|row| ProductPatch {
                sizes: row.sizes.clone(),
                colors: row.colors.clone(),
            })
            .unwrap_or_default()
    }

    pub fn remove(&mut self, id: &str) {
        self.rows.remove(id);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn snapshot(&self) -> HashMap<String, VariantSelection> {
        self.rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, in_stock: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "productName": name,
            "category": category,
            "price": 10,
            "inStock": in_stock,
            "stockQuantity": 1
        }))
        .unwrap()
    }

    fn loaded() -> ProductListView {
        let mut view = ProductListView::default();
        view.replace(vec![
            product("1", "Trail Runner", "Shoes", 5),
            product("2", "Race Tee", "Clothing", 0),
            product("3", "Road Shoe", "Shoes", 2),
            product("4", "Shoe Bag", "Accessories", 1),
        ]);
        view
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn text_filter_matches_name_or_category() {
        let view = loaded();
        let filter = ProductFilter {
            search: Some("SHOE".into()),
            category: None,
        };
        assert_eq!(ids(&view.filtered(&filter)), vec!["1", "3", "4"]);

        let filter = ProductFilter {
            search: Some("shoe".into()),
            category: Some("Accessories".into()),
        };
        assert_eq!(ids(&view.filtered(&filter)), vec!["4"]);

        let filter = ProductFilter {
            search: Some(String::new()),
            category: Some("All".into()),
        };
        assert_eq!(view.filtered(&filter).len(), 4);
        assert!(!filter.is_mount());
    }

    #[test]
    fn categories_are_unique_in_first_seen_order() {
        assert_eq!(
            loaded().categories(),
            vec!["Shoes", "Clothing", "Accessories"]
        );
    }

    #[test]
    fn stock_levels_update_single_row() {
        let mut view = loaded();
        let levels = StockLevels {
            in_stock: Some(9),
            stock_quantity: None,
        };
        assert!(view.apply_stock_levels("3", &levels));
        assert_eq!(view.find("3").unwrap().in_stock, 9);
        assert_eq!(view.find("3").unwrap().stock_quantity, 1);

        assert!(!view.apply_stock_levels("3", &StockLevels::default()));
        assert!(!view.apply_stock_levels("missing", &levels));
    }

    #[test]
    fn stock_summary_modes_and_totals() {
        let view = loaded();
        let summary = StockSummary::build(&view, &StockQuery::default());
        assert_eq!(summary.mode, StockMode::In);
        assert_eq!(ids(&summary.rows), vec!["1", "3", "4"]);
        assert_eq!(summary.total_current_stock, 8);

        let summary = StockSummary::build(
            &view,
            &StockQuery {
                mode: Some(StockMode::Out),
                category: Some("All".into()),
            },
        );
        assert_eq!(ids(&summary.rows), vec!["2"]);
        assert_eq!(summary.total_current_stock, 0);

        let summary = StockSummary::build(
            &view,
            &StockQuery {
                mode: Some(StockMode::In),
                category: Some("Shoes".into()),
            },
        );
        assert_eq!(summary.total_current_stock, 7);
    }

    #[test]
    fn selections_merge_per_row() {
        let mut selections = VariantSelections::default();
        selections.select(
            "1",
            VariantSelection {
                sizes: Some(vec!["M".into(), "M".into()]),
                colors: None,
            },
        );
        selections.select(
            "1",
            VariantSelection {
                sizes: None,
                colors: Some(vec!["Red".into()]),
            },
        );

        let patch = selections.patch_for("1");
        assert_eq!(patch.sizes, Some(vec!["M".to_string()]));
        assert_eq!(patch.colors, Some(vec!["Red".to_string()]));
        assert!(selections.patch_for("2").is_empty());
    }
}
