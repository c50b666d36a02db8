use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

// children first
const DROP: &str = "
DROP TABLE IF EXISTS Sales;
DROP TABLE IF EXISTS Day_Passes;
DROP TABLE IF EXISTS Visits;
DROP TABLE IF EXISTS Members;
DROP TABLE IF EXISTS Customers;
";

// Sales.member_id is nullable and not a foreign key
const CREATE: &str = "
CREATE TABLE Customers (
    customer_id INTEGER PRIMARY KEY,
    name VARCHAR(50),
    age INTEGER
);

CREATE TABLE Members (
    member_id INTEGER PRIMARY KEY,
    customer_id INTEGER,
    name VARCHAR(50),
    age INTEGER,
    join_date DATE,
    is_active BOOLEAN,
    FOREIGN KEY (customer_id) REFERENCES Customers(customer_id)
);

CREATE TABLE Visits (
    visit_id INTEGER PRIMARY KEY,
    member_id INTEGER,
    date DATE,
    time TIME,
    duration INTEGER,
    FOREIGN KEY (member_id) REFERENCES Members(member_id)
);

CREATE TABLE Day_Passes (
    day_pass_id INTEGER PRIMARY KEY,
    purchaser_id INTEGER,
    date DATE,
    pass_type VARCHAR(20),
    group_ages VARCHAR(100),
    FOREIGN KEY (purchaser_id) REFERENCES Customers(customer_id)
);

CREATE TABLE Sales (
    sale_id INTEGER PRIMARY KEY,
    customer_id INTEGER,
    member_id INTEGER NULL,
    date DATE,
    item VARCHAR(50),
    price DECIMAL(10,2),
    FOREIGN KEY (customer_id) REFERENCES Customers(customer_id)
);
";

/// Drops and recreates all tables.
pub fn create_tables(conn: &Connection) -> Result<()> {
    info!("recreating tables...");
    conn.execute_batch(DROP)?;
    conn.execute_batch(CREATE)?;

    Ok(())
}

pub fn drop_tables(conn: &Connection) -> Result<()> {
    info!("dropping tables...");
    conn.execute_batch(DROP)?;

    Ok(())
}
