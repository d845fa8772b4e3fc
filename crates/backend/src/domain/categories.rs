use contracts::shared::category_cache::CategorySnapshot;

use crate::domain::{a001_department, a002_institute, a003_unit};

/// All three category lists. The reads run concurrently.
pub async fn load_snapshot() -> anyhow::Result<CategorySnapshot> {
    let (departments, institutes, units) = tokio::try_join!(
        a001_department::service::list_all(),
        a002_institute::service::list_all(),
        a003_unit::service::list_all(),
    )?;
    Ok(CategorySnapshot {
        departments: departments.iter().map(|d| d.to_category_item()).collect(),
        institutes: institutes.iter().map(|i| i.to_category_item()).collect(),
        units: units.iter().map(|u| u.to_category_item()).collect(),
    })
}
