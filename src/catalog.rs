use rust_decimal::Decimal;

use crate::client::StorefrontClient;
use crate::model::{sample_courses, Course};

/// Read-only pricing source for the cart
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The launch courses, used whenever the API can't be reached
    pub fn fallback() -> Self {
        let courses = sample_courses()
            .into_iter()
            .zip(1..)
            .map(|(course, id)| course.into_course(id))
            .collect();
        Self { courses }
    }

    /// Fetch the catalog from the API, falling back to the static courses
    #[tracing::instrument(name = "Load catalog", skip(client))]
    pub async fn load(client: &StorefrontClient) -> Self {
        match client.courses().await {
            Ok(courses) if !courses.is_empty() => Self::new(courses),
            Ok(_) => {
                tracing::warn!("Catalog API returned no courses, using fallback catalog");
                Self::fallback()
            }
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Failed to fetch catalog, using fallback catalog");
                Self::fallback()
            }
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: i32) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn price(&self, id: i32) -> Option<Decimal> {
        self.course(id).map(|course| course.price)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.course(id).is_some()
    }
}
