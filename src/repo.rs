mod contacts;
mod courses;
mod orders;
mod users;

pub use contacts::ContactsRepo;
pub use courses::CoursesRepo;
pub use orders::OrdersRepo;
pub use users::UsersRepo;
