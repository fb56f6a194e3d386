mod analytics;
mod api;
mod contact;
mod course;
mod order;
mod user;

pub use analytics::Analytics;
pub use api::{ContactForm, ContactReceipt, OrderDetails, OrderSubmission, PlacedOrder};
pub use contact::{Contact, NewContact};
pub use course::{sample_courses, Course, NewCourse};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use user::{NewUser, Role, User, UserUpdate};
