//! Custom request extractors.

mod boat_form;
mod validated_json;

pub use boat_form::{BoatCreateForm, BoatForm, BoatUpdateForm};
pub use validated_json::ValidatedJson;
