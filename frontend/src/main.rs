mod components;
mod layouts;
mod pages;
mod router;
mod services;
mod theme;

use std::rc::Rc;

use mailadmin_client::Services;
use yew::prelude::*;
use yew_router::{BrowserRouter, Switch};

use crate::router::{switch, Route};
use crate::theme::{Theme, ThemeContext};

#[function_component(App)]
fn app() -> Html {
    let services = use_memo((), |_| services::api::build_services());
    let theme = use_state(|| Theme::Light);

    let theme_context = {
        let current = *theme;
        let theme = theme.clone();
        ThemeContext {
            theme: current,
            toggle: Callback::from(move |_: ()| theme.set(current.toggled())),
        }
    };

    html! {
        <ContextProvider<Rc<Services>> context={services}>
            <ContextProvider<ThemeContext> context={theme_context}>
                <BrowserRouter>
                    <div id="app" class={classes!("app", "flex", "h-full", "w-full", theme.class())}>
                        <Switch<Route> render={switch} />
                    </div>
                </BrowserRouter>
            </ContextProvider<ThemeContext>>
        </ContextProvider<Rc<Services>>>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    yew::Renderer::<App>::new().render();
}
