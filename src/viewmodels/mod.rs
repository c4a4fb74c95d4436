pub mod alerts_viewmodel;
pub mod customers_viewmodel;
pub mod database_viewmodel;

pub use alerts_viewmodel::AlertsViewModel;
pub use customers_viewmodel::CustomersViewModel;
pub use database_viewmodel::DatabaseViewModel;
