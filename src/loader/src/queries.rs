use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;
use tracing::info;

use crate::error::LoaderError;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedQuery {
    pub name: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
}

impl CannedQuery {
    pub fn file_name(&self) -> String {
        format!("{}.sql", self.name)
    }

    /// The query as written to disk, description first.
    pub fn to_file_content(&self) -> String {
        format!("-- {}\n{}\n", self.description, self.sql.trim())
    }
}

pub const QUERIES: &[CannedQuery] = &[
    CannedQuery {
        name: "members_by_age_group",
        description: "Groups members into age brackets and counts how many fall into each",
        sql: "
SELECT
    CASE
        WHEN age BETWEEN 5 AND 17 THEN 'Under 18'
        WHEN age BETWEEN 18 AND 25 THEN '18-25'
        WHEN age BETWEEN 26 AND 35 THEN '26-35'
        WHEN age BETWEEN 36 AND 45 THEN '36-45'
        WHEN age > 45 THEN '46+'
    END AS age_group,
    COUNT(*) AS total_members
FROM Members
GROUP BY age_group
ORDER BY total_members DESC;",
    },
    CannedQuery {
        name: "visits_per_month",
        description: "Shows how many visits each member made per month",
        sql: "
SELECT
    strftime('%Y-%m', date) AS visit_month,
    member_id,
    COUNT(*) AS total_visits
FROM Visits
GROUP BY visit_month, member_id
ORDER BY visit_month DESC, total_visits DESC;",
    },
    CannedQuery {
        name: "top_buyers",
        description: "Lists the top 10 customers by total spending",
        sql: "
SELECT customer_id, COUNT(*) AS total_purchases, ROUND(SUM(price), 2) AS total_spent
FROM Sales
GROUP BY customer_id
ORDER BY total_spent DESC
LIMIT 10;",
    },
    CannedQuery {
        name: "sales_by_item",
        description: "Shows how many times each item was sold",
        sql: "
SELECT item, COUNT(*) AS times_sold
FROM Sales
GROUP BY item
ORDER BY times_sold DESC;",
    },
    CannedQuery {
        name: "avg_visit_duration",
        description: "Lists members with the longest average visit duration",
        sql: "
SELECT member_id, AVG(duration) AS avg_duration
FROM Visits
GROUP BY member_id
ORDER BY avg_duration DESC
LIMIT 10;",
    },
    CannedQuery {
        name: "revenue_by_month",
        description: "Sums up total sales revenue by month",
        sql: "
SELECT
    strftime('%Y-%m', date) AS sales_month,
    ROUND(SUM(price), 2) AS total_revenue
FROM Sales
GROUP BY sales_month
ORDER BY sales_month DESC;",
    },
    CannedQuery {
        name: "active_vs_inactive_members",
        description: "Compares the number of active vs. inactive members",
        sql: "
SELECT is_active, COUNT(*) AS total_members
FROM Members
GROUP BY is_active;",
    },
    CannedQuery {
        name: "weekday_popularity",
        description: "Shows which days of the week have the most visits",
        sql: "
SELECT
    CASE strftime('%w', date)
        WHEN '0' THEN 'Sunday'
        WHEN '1' THEN 'Monday'
        WHEN '2' THEN 'Tuesday'
        WHEN '3' THEN 'Wednesday'
        WHEN '4' THEN 'Thursday'
        WHEN '5' THEN 'Friday'
        WHEN '6' THEN 'Saturday'
    END AS weekday,
    COUNT(*) AS visit_count
FROM Visits
GROUP BY weekday
ORDER BY visit_count DESC;",
    },
    CannedQuery {
        name: "buyers_who_never_visited",
        description: "Finds customers who bought something but never visited as a member",
        sql: "
SELECT DISTINCT s.customer_id
FROM Sales s
LEFT JOIN Members m ON m.customer_id = s.customer_id
LEFT JOIN Visits v ON v.member_id = m.member_id
WHERE v.visit_id IS NULL
ORDER BY s.customer_id;",
    },
    CannedQuery {
        name: "average_days_between_visits",
        description: "Calculates average number of days between visits per member",
        sql: "
SELECT member_id, AVG(gap) AS avg_days_between_visits
FROM (
    SELECT
        member_id,
        julianday(date) - julianday(LAG(date) OVER (PARTITION BY member_id ORDER BY date)) AS gap
    FROM Visits
)
WHERE gap IS NOT NULL
GROUP BY member_id
ORDER BY avg_days_between_visits;",
    },
    CannedQuery {
        name: "spending_vs_visits",
        description: "Compares visit frequency and total spending per member",
        sql: "
SELECT
    v.member_id,
    v.total_visits,
    ROUND(COALESCE(s.total_spent, 0), 2) AS total_spent
FROM (SELECT member_id, COUNT(*) AS total_visits FROM Visits GROUP BY member_id) v
LEFT JOIN (
    SELECT member_id, SUM(price) AS total_spent
    FROM Sales
    WHERE member_id IS NOT NULL
    GROUP BY member_id
) s ON s.member_id = v.member_id
ORDER BY total_spent DESC;",
    },
    CannedQuery {
        name: "day_pass_vs_member_usage",
        description: "Compares how many people used memberships vs. day passes",
        sql: "
SELECT
    (SELECT COUNT(*) FROM Visits) AS total_member_visits,
    (SELECT COUNT(*) FROM Day_Passes) AS total_day_pass_visits;",
    },
];

pub fn find(name: &str) -> Result<&'static CannedQuery> {
    QUERIES
        .iter()
        .find(|q| q.name == name)
        .ok_or_else(|| LoaderError::UnknownQuery(name.to_string()))
}

/// Writes one `<name>.sql` file per canned query into `dir`, creating it if needed.
pub fn write_queries(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(QUERIES.len());
    for query in QUERIES {
        let path = dir.join(query.file_name());
        fs::write(&path, query.to_file_content())?;
        debug!("{} -> {path:?}", query.name);
        paths.push(path);
    }
    info!("{} queries saved to {dir:?}", paths.len());

    Ok(paths)
}

/// Runs the named query and streams the result, header first, as CSV into `out`.
/// Returns the number of data rows.
pub fn run_query<W: io::Write>(conn: &Connection, name: &str, out: W) -> Result<usize> {
    let query = find(name)?;
    let mut stmt = conn.prepare(query.sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&columns)?;

    let mut rows = stmt.query([])?;
    let mut n = 0;
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            record.push(value_to_string(row.get_ref(idx)?));
        }
        wtr.write_record(&record)?;
        n += 1;
    }
    wtr.flush()?;

    Ok(n)
}

fn value_to_string(v: ValueRef<'_>) -> String {
    match v {
        ValueRef::Null => String::new(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(v) | ValueRef::Blob(v) => String::from_utf8_lossy(v).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rusqlite::Connection;

    use super::find;
    use super::run_query;
    use super::QUERIES;
    use crate::error::LoaderError;
    use crate::schema::create_tables;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = QUERIES.iter().map(|q| q.name).collect();
        assert_eq!(names.len(), QUERIES.len());
    }

    #[test]
    fn test_unknown_query() {
        assert!(matches!(find("nope"), Err(LoaderError::UnknownQuery(_))));
    }

    #[test]
    fn test_queries_run_on_empty_schema() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        for query in QUERIES {
            let mut out = vec![];
            let rows = run_query(&conn, query.name, &mut out).unwrap();
            let out = String::from_utf8(out).unwrap();
            assert!(!out.is_empty(), "{}: header expected", query.name);
            // only the scalar summary yields a row on empty tables
            if query.name == "day_pass_vs_member_usage" {
                assert_eq!(rows, 1);
                assert_eq!(out, "total_member_visits,total_day_pass_visits\n0,0\n");
            } else {
                assert_eq!(rows, 0, "{}", query.name);
            }
        }
    }

    #[test]
    fn test_file_content() {
        let q = find("sales_by_item").unwrap();
        assert_eq!(q.file_name(), "sales_by_item.sql");
        assert!(q
            .to_file_content()
            .starts_with("-- Shows how many times each item was sold\nSELECT item"));
    }
}
