use strum_macros::AsRefStr;
use strum_macros::Display;
use strum_macros::EnumIter;

mod records;

pub use records::Customer;
pub use records::DayPass;
pub use records::GroupAges;
pub use records::Item;
pub use records::Member;
pub use records::PassType;
pub use records::Sale;
pub use records::Visit;

/// Output tables, in foreign key order: every table only references tables listed before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Table {
    #[strum(serialize = "Customers")]
    Customers,
    #[strum(serialize = "Members")]
    Members,
    #[strum(serialize = "Visits")]
    Visits,
    #[strum(serialize = "Day_Passes")]
    DayPasses,
    #[strum(serialize = "Sales")]
    Sales,
}

impl Table {
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Customers => "customers.csv",
            Table::Members => "members.csv",
            Table::Visits => "visits.csv",
            Table::DayPasses => "day_passes.csv",
            Table::Sales => "sales.csv",
        }
    }

    /// Column order of both the CSV file and the SQL table.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Customers => &["customer_id", "name", "age"],
            Table::Members => &[
                "member_id",
                "customer_id",
                "name",
                "age",
                "join_date",
                "is_active",
            ],
            Table::Visits => &["visit_id", "member_id", "date", "time", "duration"],
            Table::DayPasses => &[
                "day_pass_id",
                "purchaser_id",
                "date",
                "pass_type",
                "group_ages",
            ],
            Table::Sales => &["sale_id", "customer_id", "member_id", "date", "item", "price"],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub members: Vec<Member>,
    pub visits: Vec<Visit>,
    pub day_passes: Vec<DayPass>,
    pub sales: Vec<Sale>,
}

impl Dataset {
    pub fn rows(&self, table: Table) -> usize {
        match table {
            Table::Customers => self.customers.len(),
            Table::Members => self.members.len(),
            Table::Visits => self.visits.len(),
            Table::DayPasses => self.day_passes.len(),
            Table::Sales => self.sales.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::Table;

    #[test]
    fn test_table_names() {
        let names: Vec<String> = Table::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec![
            "Customers",
            "Members",
            "Visits",
            "Day_Passes",
            "Sales"
        ]);
        assert_eq!(Table::DayPasses.file_name(), "day_passes.csv");
    }
}
