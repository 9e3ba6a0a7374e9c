//! Rust structs that represent the persisted entities.
//!
//! Associations are held as id sets rather than object references: the
//! participant/event relation lives in the `event_participants` table and
//! both sides only ever see the ids of the other side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role a participant plays in the events they are attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")] // Store as TEXT in SQLite
pub enum Role {
    Organisateur,
    Intervenant,
    Visiteur,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Organisateur => write!(f, "ORGANISATEUR"),
            Role::Intervenant => write!(f, "INTERVENANT"),
            Role::Visiteur => write!(f, "VISITEUR"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORGANISATEUR" => Ok(Role::Organisateur),
            "INTERVENANT" => Ok(Role::Intervenant),
            "VISITEUR" => Ok(Role::Visiteur),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// `None` until the participant has been saved once.
    pub id: Option<i64>,
    pub name: String,
    pub first_name: String,
    pub role: Role,
    /// Ids of the events this participant is attached to.
    pub events: BTreeSet<i64>,
}

impl Participant {
    pub fn new(name: impl Into<String>, first_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            name: name.into(),
            first_name: first_name.into(),
            role,
            events: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    /// Unique across all events; used as a lookup key.
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cost: f64,
    /// Ids of the participants attached to this event.
    pub participants: BTreeSet<i64>,
    pub logistics: Vec<Logistics>,
}

impl Event {
    pub fn new(description: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: None,
            description: description.into(),
            start_date,
            end_date,
            cost: 0.0,
            participants: BTreeSet::new(),
            logistics: Vec::new(),
        }
    }

    /// Sum of `unit_price * quantity` over the reserved logistics items.
    pub fn reserved_cost(&self) -> f64 {
        self.logistics
            .iter()
            .filter(|l| l.reserved)
            .map(Logistics::line_cost)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logistics {
    pub id: Option<i64>,
    pub description: String,
    pub reserved: bool,
    pub unit_price: f64,
    pub quantity: i32,
    /// Owning event, set when the item is attached to one.
    pub event_id: Option<i64>,
}

impl Logistics {
    pub fn new(description: impl Into<String>, reserved: bool, unit_price: f64, quantity: i32) -> Self {
        Self {
            id: None,
            description: description.into(),
            reserved,
            unit_price,
            quantity,
            event_id: None,
        }
    }

    pub fn line_cost(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reserved_cost_skips_unreserved_items() {
        let mut event = Event::new("Forum", date(2024, 5, 1), date(2024, 5, 2));
        event.logistics.push(Logistics::new("Chairs", true, 100.0, 2));
        event.logistics.push(Logistics::new("Stage", false, 1500.0, 1));
        event.logistics.push(Logistics::new("Coffee", true, 2.5, 40));

        assert_eq!(event.reserved_cost(), 300.0);
    }

    #[test]
    fn test_reserved_cost_of_empty_event_is_zero() {
        let event = Event::new("Empty", date(2024, 5, 1), date(2024, 5, 1));
        assert_eq!(event.reserved_cost(), 0.0);
    }

    #[test]
    fn test_role_text_representation() {
        assert_eq!(Role::Organisateur.to_string(), "ORGANISATEUR");
        assert_eq!("VISITEUR".parse::<Role>(), Ok(Role::Visiteur));
        assert!("organizer".parse::<Role>().is_err());

        let json = serde_json::to_string(&Role::Intervenant).unwrap();
        assert_eq!(json, "\"INTERVENANT\"");
    }
}
