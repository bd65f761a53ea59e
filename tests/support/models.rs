use jsondata::{Field, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Field<String>,
    pub age: Field<u32>,
}

impl User {
    pub fn new(id: &str, name: &str, age: u32) -> Self {
        Self {
            id: id.to_string(),
            name: Field::new(name.to_string()),
            age: Field::new(age),
        }
    }
}

impl Model for User {
    const TYPE_NAME: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn fault_shell() -> Self {
        Self {
            id: String::new(),
            name: Field::unloaded(),
            age: Field::unloaded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: String,
    pub k1: Field<i64>,
    pub k2: Field<i64>,
    pub ratio: Field<f64>,
}

impl Score {
    pub fn new(id: &str, k1: i64, k2: i64) -> Self {
        Self {
            id: id.to_string(),
            k1: Field::new(k1),
            k2: Field::new(k2),
            ratio: Field::new(0.0),
        }
    }
}

impl Model for Score {
    const TYPE_NAME: &'static str = "Score";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn fault_shell() -> Self {
        Self {
            id: String::new(),
            k1: Field::unloaded(),
            k2: Field::unloaded(),
            ratio: Field::unloaded(),
        }
    }
}
