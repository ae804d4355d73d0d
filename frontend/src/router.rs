use yew::prelude::*;
use yew_router::prelude::*;

use crate::layouts::admin::AdminLayout;

#[derive(Debug, Clone, Copy, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/admin/dashboard")]
    Dashboard,
    #[at("/admin/messages")]
    Messages,
    #[at("/admin/settings")]
    Settings,
    #[at("/admin/grants/callback")]
    GrantCallback,
    #[at("/admin")]
    AdminRoot,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Title shown in the navbar breadcrumb.
    pub fn title(self) -> &'static str {
        match self {
            Route::Messages => "Messages",
            Route::Settings => "Settings",
            Route::GrantCallback => "Connect Gmail",
            Route::Dashboard | Route::AdminRoot | Route::NotFound => "Admin",
        }
    }
}

/// Entries rendered by the sidebar, in order.
pub const SIDEBAR_ROUTES: [(Route, &str); 3] = [
    (Route::Dashboard, "Dashboard"),
    (Route::Messages, "Messages"),
    (Route::Settings, "Settings"),
];

pub fn switch(route: Route) -> Html {
    match route {
        Route::AdminRoot | Route::NotFound => html! { <Redirect<Route> to={Route::Dashboard} /> },
        page => html! { <AdminLayout route={page} /> },
    }
}
