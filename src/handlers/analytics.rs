use actix_web::web::{Data, Json, Path};

use crate::core::models::analytics::AnalyticsReport;
use crate::core::services::analytics;
use crate::database::postgres::PgStore;
use crate::error::Error;

pub async fn survey_analytics(survey_id: Path<(i32,)>, store: Data<PgStore>) -> Result<Json<AnalyticsReport>, Error> {
    let report = analytics::survey_analytics(store.get_ref(), survey_id.into_inner().0).await?;
    Ok(Json(report))
}
