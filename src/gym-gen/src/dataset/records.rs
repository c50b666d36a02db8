use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use strum_macros::Display;
use strum_macros::EnumString;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: u64,
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: u64,
    pub customer_id: u64,
    pub name: String,
    pub age: u32,
    pub join_date: NaiveDate,
    #[serde(with = "bool_int")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub visit_id: u64,
    pub member_id: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    // minutes
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PassType {
    Single,
    Family,
    Student,
}

impl PassType {
    pub const ALL: [PassType; 3] = [PassType::Single, PassType::Family, PassType::Student];
}

/// Ages of everyone covered by a day pass purchase, purchaser first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupAges(pub Vec<u32>);

impl fmt::Display for GroupAges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, age) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{age}")?;
        }

        Ok(())
    }
}

impl FromStr for GroupAges {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(GroupAges::default());
        }

        s.split(',')
            .map(|v| v.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map(GroupAges)
    }
}

impl Serialize for GroupAges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupAges {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPass {
    pub day_pass_id: u64,
    pub purchaser_id: u64,
    pub date: NaiveDate,
    pub pass_type: PassType,
    pub group_ages: GroupAges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Item {
    #[serde(rename = "Chalk Bag")]
    #[strum(serialize = "Chalk Bag")]
    ChalkBag,
    #[serde(rename = "Shoes Rental")]
    #[strum(serialize = "Shoes Rental")]
    ShoesRental,
    #[serde(rename = "Protein Bar")]
    #[strum(serialize = "Protein Bar")]
    ProteinBar,
    #[serde(rename = "Water Bottle")]
    #[strum(serialize = "Water Bottle")]
    WaterBottle,
    #[serde(rename = "T-Shirt")]
    #[strum(serialize = "T-Shirt")]
    TShirt,
    Gatorade,
    Celsius,
}

impl Item {
    pub const ALL: [Item; 7] = [
        Item::ChalkBag,
        Item::ShoesRental,
        Item::ProteinBar,
        Item::WaterBottle,
        Item::TShirt,
        Item::Gatorade,
        Item::Celsius,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: u64,
    pub customer_id: u64,
    // None for buyers without a membership
    pub member_id: Option<u64>,
    pub date: NaiveDate,
    pub item: Item,
    pub price: Decimal,
}

mod bool_int {
    use serde::de;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(v: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(de::Error::custom(format!("expected 0 or 1, got {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::GroupAges;
    use super::Item;
    use super::Member;
    use super::Sale;

    fn to_csv<T: serde::Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_group_ages() {
        let ages: GroupAges = "34,7, 9".parse().unwrap();
        assert_eq!(ages, GroupAges(vec![34, 7, 9]));
        assert_eq!(ages.to_string(), "34,7,9");
        assert!("34,x".parse::<GroupAges>().is_err());
    }

    #[test]
    fn test_sale_without_member_has_empty_member_id() {
        let sales = vec![
            Sale {
                sale_id: 1,
                customer_id: 4000,
                member_id: None,
                date: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
                item: Item::ChalkBag,
                price: Decimal::new(1250, 2),
            },
            Sale {
                sale_id: 2,
                customer_id: 12,
                member_id: Some(12),
                date: NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
                item: Item::Celsius,
                price: Decimal::new(500, 2),
            },
        ];

        let out = to_csv(&sales);
        assert_eq!(
            out,
            "sale_id,customer_id,member_id,date,item,price\n\
             1,4000,,2024-02-03,Chalk Bag,12.50\n\
             2,12,12,2024-02-04,Celsius,5.00\n"
        );

        let mut rdr = csv::Reader::from_reader(out.as_bytes());
        let back: Vec<Sale> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(back, sales);
    }

    #[test]
    fn test_member_active_flag_is_numeric() {
        let member = Member {
            member_id: 1,
            customer_id: 1,
            name: "Emma Lee".to_string(),
            age: 31,
            join_date: NaiveDate::from_ymd_opt(2023, 11, 20).unwrap(),
            is_active: true,
        };

        let out = to_csv(&[member.clone()]);
        assert_eq!(
            out,
            "member_id,customer_id,name,age,join_date,is_active\n1,1,Emma Lee,31,2023-11-20,1\n"
        );
    }
}
