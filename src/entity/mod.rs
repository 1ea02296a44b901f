pub mod cart_items;
pub mod categories;
pub mod items;
pub mod order_items;
pub mod orders;
pub mod reservations;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use items::Entity as Items;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use reservations::Entity as Reservations;
pub use users::Entity as Users;
