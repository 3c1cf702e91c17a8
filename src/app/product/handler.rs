//! 商品页面处理器

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

use super::{
    image::encode_data_url,
    model::{
        Product, ProductForm, StockAdjustment, CATEGORY_OPTIONS, COLOR_OPTIONS, SIZE_OPTIONS,
    },
    view::{ProductFilter, StockQuery, StockSummary, VariantSelection},
};
use crate::app::{
    navigation::{page::Page, router::Route},
    state::AppState,
};
use crate::core::{
    error::CoreError,
    form::{FormSlot, FormState},
    response::Notification,
};
use crate::infrastructure::http_client::check_record_id;

const FETCH_FAILED: &str = "Failed to fetch products";
const CREATE_FAILED: &str = "Failed to create product. Please try again.";
const STOCK_FAILED: &str = "Stock update failed";
const UPDATE_FAILED: &str = "Failed to update product";
const DELETE_FAILED: &str = "Failed to delete product";
const VARIANTS_FAILED: &str = "Update failed";

#[derive(Debug, Serialize)]
pub struct ProductListContent {
    pub products: Vec<Product>,
    pub total: usize,
    pub categories: Vec<String>,
    pub filter: ProductFilter,
    pub selections: HashMap<String, VariantSelection>,
    pub size_options: [&'static str; 6],
    pub color_options: [&'static str; 6],
}

#[derive(Debug, Serialize)]
pub struct ProductFormContent {
    pub id: Option<String>,
    pub form: FormState<ProductForm>,
    pub category_options: [&'static str; 3],
    pub size_options: [&'static str; 6],
    pub color_options: [&'static str; 6],
}

impl ProductFormContent {
    fn new(id: Option<String>, slot: &FormSlot<ProductForm>) -> Self {
        Self {
            id,
            form: slot.snapshot(),
            category_options: CATEGORY_OPTIONS,
            size_options: SIZE_OPTIONS,
            color_options: COLOR_OPTIONS,
        }
    }
}

async fn refresh_products(state: &AppState) -> Result<(), CoreError> {
    let products = state.products.list().await?;
    info!("已加载 {} 个商品", products.len());
    state.product_list_mut().replace(products);
    Ok(())
}

fn list_content(state: &AppState, filter: ProductFilter) -> ProductListContent {
    let list = state.product_list();
    let products = list.filtered(&filter);
    ProductListContent {
        total: list.products().len(),
        categories: list.categories(),
        products,
        filter,
        selections: state.variants().snapshot(),
        size_options: SIZE_OPTIONS,
        color_options: COLOR_OPTIONS,
    }
}

fn list_page(state: &AppState, filter: ProductFilter) -> Page<ProductListContent> {
    state.page(Route::ProductList, list_content(state, filter))
}

fn stock_page(state: &AppState, query: &StockQuery) -> Page<StockSummary> {
    let summary = StockSummary::build(&state.product_list(), query);
    state.page(Route::StockManagement, summary)
}

/// 进入页面时拉取；只改过滤条件时直接用已加载的数据
pub async fn product_list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Page<ProductListContent> {
    let loaded = state.product_list().is_loaded();
    if filter.is_mount() || !loaded {
        if let Err(err) = refresh_products(&state).await {
            warn!("加载商品失败: {}", err);
            let content = list_content(&state, filter);
            return Page::failed(Route::ProductList, content, &err, FETCH_FAILED);
        }
    }
    list_page(&state, filter)
}

pub async fn stock_management(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Page<StockSummary> {
    let loaded = state.product_list().is_loaded();
    if query.is_mount() || !loaded {
        if let Err(err) = refresh_products(&state).await {
            warn!("加载商品失败: {}", err);
            let summary = StockSummary::build(&state.product_list(), &query);
            return Page::failed(Route::StockManagement, summary, &err, FETCH_FAILED);
        }
    }
    stock_page(&state, &query)
}

/// 变更已被后端接受后刷新列表；刷新失败只记日志，下次进入列表时重新拉取
async fn refresh_after_change(state: &AppState, id: &str) {
    if let Err(err) = refresh_products(state).await {
        warn!("变更后刷新商品失败: {} - {}", id, err);
        state.product_list_mut().invalidate();
    }
}

/// 入库/出库，成功后优先用返回的库存更新该行
async fn apply_stock(
    state: &AppState,
    id: &str,
    adjustment: &StockAdjustment,
) -> Result<Notification, CoreError> {
    let known = state.product_list().find(id).map(|p| p.in_stock);
    adjustment.check(known)?;

    let levels = state.products.adjust_stock(id, adjustment).await?;
    let updated = state.product_list_mut().apply_stock_levels(id, &levels);
    if !updated {
        refresh_after_change(state, id).await;
    }
    Ok(Notification::success(adjustment.action.success_message()))
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(filter): Query<ProductFilter>,
    Json(adjustment): Json<StockAdjustment>,
) -> Page<ProductListContent> {
    let result = apply_stock(&state, &id, &adjustment).await;
    let page = list_page(&state, filter);
    match result {
        Ok(notification) => page.notify(notification),
        Err(err) => {
            warn!("库存调整失败: {} - {}", id, err);
            page.with_status(err.status_code())
                .notify(err.notification(STOCK_FAILED))
        }
    }
}

pub async fn adjust_stock_from_management(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StockQuery>,
    Json(adjustment): Json<StockAdjustment>,
) -> Page<StockSummary> {
    let result = apply_stock(&state, &id, &adjustment).await;
    let page = stock_page(&state, &query);
    match result {
        Ok(notification) => page.notify(notification),
        Err(err) => {
            warn!("库存调整失败: {} - {}", id, err);
            page.with_status(err.status_code())
                .notify(err.notification(STOCK_FAILED))
        }
    }
}

/// 提交某一行的尺码/颜色选择（局部更新）
pub async fn submit_variants(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(filter): Query<ProductFilter>,
    Json(selection): Json<VariantSelection>,
) -> Page<ProductListContent> {
    let patch = {
        let mut variants = state.variants();
        variants.select(&id, selection);
        variants.patch_for(&id)
    };

    let result = if patch.is_empty() {
        Err(CoreError::Validation(
            "Select a size or color first".to_string(),
        ))
    } else {
        state.products.patch(&id, &patch).await
    };
    if result.is_ok() {
        refresh_after_change(&state, &id).await;
    }

    let page = list_page(&state, filter);
    match result {
        Ok(()) => page.notify(Notification::success("Product updated")),
        Err(err) => {
            warn!("商品局部更新失败: {} - {}", id, err);
            page.with_status(err.status_code())
                .notify(err.notification(VARIANTS_FAILED))
        }
    }
}

pub async fn add_product_page(State(state): State<AppState>) -> Page<ProductFormContent> {
    state.page(
        Route::AddProduct,
        ProductFormContent::new(None, &state.forms.add_product),
    )
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(mut form): Json<ProductForm>,
) -> Page<ProductFormContent> {
    let slot = &state.forms.add_product;
    let Some(_ticket) = slot.begin() else {
        return Page::busy(Route::AddProduct, ProductFormContent::new(None, slot));
    };

    // 先上传的图片保留在表单里
    if form.image.is_empty() {
        form.image = slot.snapshot().values.image;
    }

    let payload = match slot.validate(form) {
        Ok(payload) => payload,
        Err(err) => {
            return Page::failed(
                Route::AddProduct,
                ProductFormContent::new(None, slot),
                &err,
                CREATE_FAILED,
            )
        }
    };

    match state.products.create(&payload).await {
        Ok(()) => {
            slot.reset();
            state.product_list_mut().invalidate();
            Page::new(Route::AddProduct, ProductFormContent::new(None, slot))
                .notify(Notification::success("Product added successfully"))
        }
        Err(err) => {
            warn!("创建商品失败: {}", err);
            slot.fail(CREATE_FAILED);
            Page::new(Route::AddProduct, ProductFormContent::new(None, slot))
                .with_status(err.status_code())
                .notify(Notification::error(CREATE_FAILED))
        }
    }
}

/// 上传商品图片，请求体为原始图片字节
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Page<ProductFormContent> {
    let slot = &state.forms.add_product;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match encode_data_url(content_type, &body) {
        Ok(data_url) => {
            info!("已附加商品图片: {} 字节", body.len());
            slot.update(|form| form.image = data_url);
            Page::new(Route::AddProduct, ProductFormContent::new(None, slot))
                .notify(Notification::success("Image attached"))
        }
        Err(err) => Page::failed(
            Route::AddProduct,
            ProductFormContent::new(None, slot),
            &err,
            "Image upload failed",
        ),
    }
}

pub async fn edit_product_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Page<ProductFormContent> {
    let slot = &state.forms.edit_product;
    match state.products.get(&id).await {
        Ok(product) => {
            slot.record(ProductForm::from(&product));
            state.page(
                Route::EditProduct(id.clone()),
                ProductFormContent::new(Some(id), slot),
            )
        }
        Err(err) => {
            warn!("加载商品失败: {} - {}", id, err);
            slot.reset();
            Page::failed(
                Route::EditProduct(id.clone()),
                ProductFormContent::new(Some(id), slot),
                &err,
                "Failed to fetch product",
            )
        }
    }
}

/// 整条更新，成功后回到列表
pub async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Response {
    let slot = &state.forms.edit_product;
    let route = Route::EditProduct(id.clone());
    let Some(_ticket) = slot.begin() else {
        return Page::busy(route, ProductFormContent::new(Some(id), slot)).into_response();
    };

    let result = match slot.validate(form) {
        Ok(payload) => state.products.update(&id, &payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            slot.reset();
            state.product_list_mut().invalidate();
            state.flash(Notification::success("Product updated successfully"));
            Redirect::to(&Route::ProductList.path()).into_response()
        }
        Err(err) => {
            warn!("更新商品失败: {} - {}", id, err);
            let message = err.user_message(UPDATE_FAILED);
            slot.fail(message.clone());
            Page::new(route, ProductFormContent::new(Some(id), slot))
                .with_status(err.status_code())
                .notify(Notification::error(message))
                .into_response()
        }
    }
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let slot = &state.forms.edit_product;
    let route = Route::EditProduct(id.clone());

    if let Err(err) = check_record_id(&id, "product") {
        return Page::new(route, ProductFormContent::new(Some(id), slot))
            .with_status(err.status_code())
            .notify(Notification::warning(err.user_message("Invalid product ID")))
            .into_response();
    }

    match state.products.delete(&id).await {
        Ok(()) => {
            slot.reset();
            state.variants().remove(&id);
            state.product_list_mut().invalidate();
            state.flash(Notification::success("Product deleted"));
            Redirect::to(&Route::ProductList.path()).into_response()
        }
        Err(err) => {
            warn!("删除商品失败: {} - {}", id, err);
            Page::new(route, ProductFormContent::new(Some(id), slot))
                .with_status(err.status_code())
                .notify(err.notification(DELETE_FAILED))
                .into_response()
        }
    }
}
