use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct DbProgressEntry {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct DbAchievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub criteria: String,
    pub xp: u32,
    pub category: String,
}
