use anyhow::Result;
use contracts::domain::a001_payroll::{PayrollRecord, PayrollStats};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryOrder, Set, Statement};
use serde::{Deserialize, Serialize};

use super::excel_import::PayrollRow;

/// Rows per INSERT, keeps bound parameters well under SQLite's limit
const INSERT_CHUNK: usize = 80;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_payroll")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub cccd: String,
    pub position: Option<String>,
    pub salary_month: String,
    #[sea_orm(column_type = "Double")]
    pub total_income: f64,
    #[sea_orm(column_type = "Double")]
    pub deductions: f64,
    #[sea_orm(column_type = "Double")]
    pub net_salary: f64,
    pub source_file: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PayrollRecord {
    fn from(m: Model) -> Self {
        PayrollRecord {
            id: m.id,
            employee_id: m.employee_id,
            full_name: m.full_name,
            cccd: m.cccd,
            position: m.position,
            salary_month: m.salary_month,
            total_income: m.total_income,
            deductions: m.deductions,
            net_salary: m.net_salary,
            source_file: m.source_file,
            created_at: m.created_at,
        }
    }
}

fn to_active_model(row: &PayrollRow, source_file: &str, created_at: &str) -> ActiveModel {
    ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        employee_id: Set(row.employee_id.clone()),
        full_name: Set(row.full_name.clone()),
        cccd: Set(row.cccd.clone()),
        position: Set(row.position.clone()),
        salary_month: Set(row.salary_month.clone()),
        total_income: Set(row.total_income),
        deductions: Set(row.deductions),
        net_salary: Set(row.net_salary),
        source_file: Set(source_file.to_string()),
        created_at: Set(created_at.to_string()),
    }
}

/// Inserts all rows of one file. Run inside the upload transaction.
pub async fn insert_rows<C>(
    conn: &C,
    source_file: &str,
    rows: &[PayrollRow],
    created_at: &str,
) -> Result<usize>
where
    C: ConnectionTrait,
{
    for chunk in rows.chunks(INSERT_CHUNK) {
        let models = chunk
            .iter()
            .map(|row| to_active_model(row, source_file, created_at));
        Entity::insert_many(models).exec(conn).await?;
    }
    Ok(rows.len())
}

/// Newest import first; rows of one import keep sheet order reversed by id
pub async fn list_all<C>(conn: &C) -> Result<Vec<PayrollRecord>>
where
    C: ConnectionTrait,
{
    let models = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn get_stats<C>(conn: &C) -> Result<PayrollStats>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        SELECT
            COUNT(*) AS total_records,
            COUNT(DISTINCT employee_id) AS total_employees,
            COALESCE(SUM(net_salary), 0.0) AS total_salary
        FROM a001_payroll
        "#
        .to_string(),
    );

    let Some(row) = conn.query_one(stmt).await? else {
        return Ok(PayrollStats::default());
    };

    Ok(PayrollStats {
        total_records: row.try_get("", "total_records")?,
        total_employees: row.try_get("", "total_employees")?,
        total_salary: row.try_get("", "total_salary")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    fn row(employee_id: &str, net: f64) -> PayrollRow {
        PayrollRow {
            employee_id: employee_id.to_string(),
            full_name: format!("Nhân viên {}", employee_id),
            cccd: "049201000123".to_string(),
            position: None,
            salary_month: "2024-01".to_string(),
            total_income: net,
            deductions: 0.0,
            net_salary: net,
        }
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let conn = test_connection().await;
        assert_eq!(get_stats(&conn).await.unwrap(), PayrollStats::default());
    }

    #[tokio::test]
    async fn test_insert_list_and_stats() {
        let conn = test_connection().await;
        insert_rows(&conn, "t1.xlsx", &[row("NV1", 100.0), row("NV2", 200.0)], "2024-01-05T00:00:00Z")
            .await
            .unwrap();
        insert_rows(&conn, "t2.xlsx", &[row("NV1", 50.0)], "2024-02-05T00:00:00Z")
            .await
            .unwrap();

        let list = list_all(&conn).await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].source_file, "t2.xlsx");
        assert_eq!(list[1].employee_id, "NV2");

        let stats = get_stats(&conn).await.unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.total_salary, 350.0);
    }

    #[tokio::test]
    async fn test_insert_more_rows_than_one_chunk() {
        let conn = test_connection().await;
        let rows: Vec<_> = (0..INSERT_CHUNK * 2 + 3)
            .map(|i| row(&format!("NV{i}"), 1.0))
            .collect();
        assert_eq!(
            insert_rows(&conn, "big.xlsx", &rows, "2024-01-01T00:00:00Z").await.unwrap(),
            rows.len()
        );
        assert_eq!(get_stats(&conn).await.unwrap().total_records as usize, rows.len());
    }
}
