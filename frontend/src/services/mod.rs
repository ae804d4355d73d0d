pub mod api;
pub mod transport;

use std::rc::Rc;

use mailadmin_client::Services;
use yew::prelude::*;

/// Services provided at the app root.
#[hook]
pub fn use_services() -> Rc<Services> {
    use_context::<Rc<Services>>().expect("services context is provided by App")
}
