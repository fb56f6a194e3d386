use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

/// Stored course record, the authoritative price source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub duration: String,
    pub instructor: String,
    /// Optional schedule, shown on the catalog page
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub time_zone: Option<String>,
}

/// Course seed data
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub duration: String,
    pub instructor: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub time_zone: Option<String>,
}

impl NewCourse {
    pub fn into_course(self, id: i32) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            duration: self.duration,
            instructor: self.instructor,
            start_date: self.start_date,
            end_date: self.end_date,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            time_zone: self.time_zone,
        }
    }
}

/// The two seminar courses offered at launch.
///
/// Mirrors the seed migration so the in-memory store and the static client
/// fallback price things identically.
pub fn sample_courses() -> Vec<NewCourse> {
    vec![
        NewCourse {
            title: "Shadows of the Past: Unpacking US History".into(),
            description: "This seminar course explores key historical events and themes shaping early America, from the arrival of the Pilgrims to the catalysts of the Civil War, through textbooks, academic articles, and videos.".into(),
            price: Decimal::new(17500, 2),
            image_url: "https://i.imgur.com/FtBEdsX.jpeg".into(),
            duration: "Length: 90 minutes".into(),
            instructor: "Kyli Brown".into(),
            start_date: Some("8 June".into()),
            end_date: Some("3 August".into()),
            day_of_week: Some("Sunday".into()),
            start_time: Some("16:00".into()),
            time_zone: Some("GMT".into()),
        },
        NewCourse {
            title: "The Obscured Path Shaping the United States from 1900-1950".into(),
            description: "This seminar course examines critical moments that shaped the United States during the first half of the 20th century, including the Second Industrial Revolution, Prohibition, the Great Depression, and both World Wars.".into(),
            price: Decimal::new(17500, 2),
            image_url: "https://i.imgur.com/d8bERIs.jpeg".into(),
            duration: "Length: 90 minutes".into(),
            instructor: "Kyli Brown".into(),
            start_date: Some("10 June".into()),
            end_date: Some("5 August".into()),
            day_of_week: Some("Tuesday".into()),
            start_time: Some("7:00".into()),
            time_zone: Some("GMT".into()),
        },
    ]
}
