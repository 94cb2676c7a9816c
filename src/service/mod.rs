//! CrudService: generic CRUD using the safe SQL builder, plus request validation.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::{FieldKind, FieldRule, Format, RequestValidator};
