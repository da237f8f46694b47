//! JSON API consumed by the landing page.
//!
//! - `POST /api/ventas/filtrar`  sales within an inclusive date range, with totals
//! - `POST /api/datos/cargar`    load the example dataset when storage is empty
//! - `POST /api/ventas/agregar`  record one sale, computing its commission
//! - `GET  /api/vendedores`      salespeople ordered by name
//!
//! Field names follow the public contract of the page script, which is Spanish.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use commission_core::engine::{CommissionEngine, ReportQuery, SaleDraft};
use commission_core::errors::{EngineError, InterfaceError, ValidationError};
use commission_core::report::{ReportLine, SalesReport};
use commission_core::seed::SeedDataset;
use commission_core::Salesperson;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const SEED_LOADED_MESSAGE: &str = "Datos cargados exitosamente";
pub const SALE_RECORDED_MESSAGE: &str = "Venta agregada exitosamente";

#[derive(Clone)]
pub struct ApiState {
    engine: CommissionEngine,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddSaleRequest {
    pub vendedor_id: Option<i64>,
    pub fecha: Option<String>,
    pub monto: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct SaleRow {
    pub id: i64,
    pub fecha: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub comision: Decimal,
    pub vendedor_nombre: String,
    pub regla_nombre: String,
}

#[derive(Debug, Serialize)]
pub struct TotalsBody {
    pub cantidad: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_ventas: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_comisiones: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub ventas: Vec<SaleRow>,
    pub totales: TotalsBody,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensaje: String,
}

#[derive(Debug, Serialize)]
pub struct SalespersonRow {
    pub id: i64,
    pub nombre: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn router(engine: CommissionEngine) -> Router {
    Router::new()
        .route("/api/ventas/filtrar", post(filter_sales))
        .route("/api/datos/cargar", post(load_example_data))
        .route("/api/ventas/agregar", post(add_sale))
        .route("/api/vendedores", get(list_salespeople))
        .with_state(ApiState { engine })
}

pub async fn filter_sales(
    State(state): State<ApiState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<FilterResponse> {
    let Json(request) = payload.map_err(|rejection| failure("filter_sales", malformed(rejection)))?;
    let query = ReportQuery { start: request.fecha_inicio, end: request.fecha_fin };

    let report =
        state.engine.filter_sales(&query).await.map_err(|error| failure("filter_sales", error))?;

    Ok(Json(FilterResponse::from(report)))
}

pub async fn load_example_data(State(state): State<ApiState>) -> ApiResult<MessageResponse> {
    let outcome = state
        .engine
        .bootstrap(&SeedDataset::example())
        .await
        .map_err(|error| failure("load_example_data", error))?;

    info!(
        event_name = "commission.api.seed_requested",
        loaded = outcome.was_loaded(),
        "{}",
        outcome.summary()
    );

    Ok(Json(MessageResponse { mensaje: SEED_LOADED_MESSAGE.to_string() }))
}

pub async fn add_sale(
    State(state): State<ApiState>,
    payload: Result<Json<AddSaleRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(request) = payload.map_err(|rejection| failure("add_sale", malformed(rejection)))?;
    let draft = SaleDraft {
        salesperson_id: request.vendedor_id,
        date: request.fecha,
        amount: request.monto,
    };

    state.engine.record_sale(draft).await.map_err(|error| failure("add_sale", error))?;

    Ok(Json(MessageResponse { mensaje: SALE_RECORDED_MESSAGE.to_string() }))
}

pub async fn list_salespeople(State(state): State<ApiState>) -> ApiResult<Vec<SalespersonRow>> {
    let salespeople = state
        .engine
        .list_salespeople()
        .await
        .map_err(|error| failure("list_salespeople", error))?;

    Ok(Json(salespeople.into_iter().map(SalespersonRow::from).collect()))
}

fn malformed(rejection: JsonRejection) -> EngineError {
    ValidationError::MalformedBody(rejection.body_text()).into()
}

/// Maps an engine failure onto a response. Internal causes are logged under a
/// fresh correlation id and replaced by a fixed message.
fn failure(operation: &'static str, error: EngineError) -> (StatusCode, Json<ApiError>) {
    let interface = error.into_interface(Uuid::new_v4().to_string());

    let status = match &interface {
        InterfaceError::BadRequest { message, correlation_id } => {
            warn!(
                event_name = "commission.api.rejected",
                correlation_id = %correlation_id,
                operation,
                reason = %message,
                "request rejected"
            );
            StatusCode::BAD_REQUEST
        }
        InterfaceError::Internal { message, correlation_id } => {
            error!(
                event_name = "commission.api.internal_error",
                correlation_id = %correlation_id,
                operation,
                error = %message,
                "request failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(ApiError { error: interface.user_message().to_string() }))
}

impl From<SalesReport> for FilterResponse {
    fn from(report: SalesReport) -> Self {
        Self {
            ventas: report.lines.into_iter().map(SaleRow::from).collect(),
            totales: TotalsBody {
                cantidad: report.totals.count,
                total_ventas: report.totals.total_amount,
                total_comisiones: report.totals.total_commission,
            },
        }
    }
}

impl From<ReportLine> for SaleRow {
    fn from(line: ReportLine) -> Self {
        Self {
            id: line.id.0,
            fecha: line.date.to_string(),
            monto: line.amount,
            comision: line.commission,
            vendedor_nombre: line.salesperson_name,
            regla_nombre: line.tier_name,
        }
    }
}

impl From<Salesperson> for SalespersonRow {
    fn from(salesperson: Salesperson) -> Self {
        Self { id: salesperson.id.0, nombre: salesperson.name, email: salesperson.email }
    }
}
