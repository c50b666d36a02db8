use std::path::Path;

use gym_gen::dataset::Customer;
use gym_gen::dataset::DayPass;
use gym_gen::dataset::Member;
use gym_gen::dataset::Sale;
use gym_gen::dataset::Table;
use gym_gen::dataset::Visit;
use rusqlite::params;
use rusqlite::Connection;
use rusqlite::Statement;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::info;

use crate::error::LoaderError;
use crate::error::Result;

/// A CSV record that maps onto one row of its table.
trait Row: DeserializeOwned {
    const TABLE: Table;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl Row for Customer {
    const TABLE: Table = Table::Customers;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.customer_id, self.name, self.age])
    }
}

impl Row for Member {
    const TABLE: Table = Table::Members;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.member_id,
            self.customer_id,
            self.name,
            self.age,
            self.join_date.to_string(),
            self.is_active,
        ])
    }
}

impl Row for Visit {
    const TABLE: Table = Table::Visits;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.visit_id,
            self.member_id,
            self.date.to_string(),
            self.time.format("%H:%M:%S").to_string(),
            self.duration,
        ])
    }
}

impl Row for DayPass {
    const TABLE: Table = Table::DayPasses;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.day_pass_id,
            self.purchaser_id,
            self.date.to_string(),
            self.pass_type.to_string(),
            self.group_ages.to_string(),
        ])
    }
}

impl Row for Sale {
    const TABLE: Table = Table::Sales;

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.sale_id,
            self.customer_id,
            // absent member becomes NULL
            self.member_id,
            self.date.to_string(),
            self.item.to_string(),
            self.price.to_string(),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub tables: Vec<(Table, usize)>,
}

impl LoadReport {
    pub fn rows(&self, table: Table) -> Option<usize> {
        self.tables.iter().find(|(t, _)| *t == table).map(|(_, n)| *n)
    }
}

fn insert_sql(table: Table) -> String {
    let columns = table.columns();
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

fn load_table<T: Row>(conn: &mut Connection, dir: &Path) -> Result<usize> {
    let path = dir.join(T::TABLE.file_name());
    if !path.try_exists()? {
        return Err(LoaderError::FileNotFound(format!("{path:?}")));
    }
    info!("loading {}...", T::TABLE);

    let mut rdr = csv::Reader::from_path(&path)?;
    let tx = conn.transaction()?;
    let mut rows = 0;
    {
        let mut stmt = tx.prepare(&insert_sql(T::TABLE))?;
        for rec in rdr.deserialize() {
            let rec: T = rec?;
            rec.insert(&mut stmt)?;
            rows += 1;
        }
    }
    tx.commit()?;
    debug!("{}: {rows} row(s) from {path:?}", T::TABLE);

    Ok(rows)
}

/// Loads every table's CSV from `dir` in foreign key order. Each table is committed on its
/// own, a failure leaves previously loaded tables in place.
pub fn load_dir(conn: &mut Connection, dir: &Path) -> Result<LoadReport> {
    if !dir.try_exists()? {
        return Err(LoaderError::FileNotFound(format!("{dir:?}")));
    }

    let tables = vec![
        (Table::Customers, load_table::<Customer>(conn, dir)?),
        (Table::Members, load_table::<Member>(conn, dir)?),
        (Table::Visits, load_table::<Visit>(conn, dir)?),
        (Table::DayPasses, load_table::<DayPass>(conn, dir)?),
        (Table::Sales, load_table::<Sale>(conn, dir)?),
    ];

    Ok(LoadReport { tables })
}
