//! Database models

pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, PaymentStatus,
    PaymentVerification, ShippingAddress, StatusUpdate,
};
pub use product::{
    Product, ProductCreate, ProductListQuery, ProductUpdate, Review, ReviewInput,
};
pub use user::{Address, AuthResponse, LoginInput, ProfileUpdate, RegisterInput, User};
