use std::rc::Rc;

use mailadmin_shared::dynamic_data::{
    AuthenticationRole, DynamicDataParams, DynamicDataResponse, EmailAllowedDomains, EmailLabels,
    EmailLastPullAt, EmailSuperEmail, SharedSystemLabel,
};
use yew::prelude::*;

use crate::components::navbar::Navbar;
use crate::components::sidebar::Sidebar;
use crate::pages::dashboard::Dashboard;
use crate::pages::grant_callback::GrantCallback;
use crate::pages::messages::Messages;
use crate::pages::settings::Settings;
use crate::router::Route;
use crate::services::use_services;

/// Dynamic data every admin page may need, fetched in one request.
pub fn layout_params() -> DynamicDataParams {
    DynamicDataParams::new()
        .enum_path::<AuthenticationRole>()
        .enum_path::<SharedSystemLabel>()
        .setting::<EmailAllowedDomains>()
        .setting::<EmailSuperEmail>()
        .setting::<EmailLastPullAt>()
        .setting::<EmailLabels>()
}

#[derive(Properties, PartialEq)]
pub struct AdminLayoutProps {
    pub route: Route,
}

#[function_component(AdminLayout)]
pub fn admin_layout(props: &AdminLayoutProps) -> Html {
    let services = use_services();
    let sidebar_open = use_state(|| true);
    let snapshot = use_state(|| None::<Rc<DynamicDataResponse>>);
    let loading = use_state(|| true);

    let refresh = {
        let services = services.clone();
        let snapshot = snapshot.clone();
        let loading = loading.clone();
        Callback::from(move |_: ()| {
            let services = services.clone();
            let snapshot = snapshot.clone();
            let loading = loading.clone();
            loading.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match services.dynamic_data.get(&layout_params()).await {
                    Ok(data) => snapshot.set(Some(Rc::new(data))),
                    Err(e) => {
                        // Previous snapshot stays on screen.
                        tracing::warn!("Failed to fetch dynamic data: {}", e);
                    }
                }
                loading.set(false);
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let open_sidenav = {
        let sidebar_open = sidebar_open.clone();
        Callback::from(move |_: ()| sidebar_open.set(true))
    };
    let close_sidenav = {
        let sidebar_open = sidebar_open.clone();
        Callback::from(move |_: ()| sidebar_open.set(false))
    };

    let profile = (*snapshot).as_ref().and_then(|data| data.setting::<EmailSuperEmail>());
    let avatar_url = profile
        .as_ref()
        .filter(|p| !p.picture.is_empty())
        .map(|p| AttrValue::from(p.picture.clone()));
    let user_name = profile.as_ref().map(|p| AttrValue::from(p.name.clone()));

    let page = match props.route {
        Route::Messages => html! {
            <Messages labels={(*snapshot).as_ref().and_then(|data| data.enum_value::<SharedSystemLabel>())} />
        },
        Route::Settings => html! { <Settings on_refresh={refresh.clone()} /> },
        Route::GrantCallback => html! { <GrantCallback on_refresh={refresh.clone()} /> },
        _ => html! {
            <Dashboard
                snapshot={(*snapshot).clone()}
                loading={*loading}
                on_refresh={refresh.clone()}
            />
        },
    };

    html! {
        <div class="flex h-full w-full">
            <Sidebar open={*sidebar_open} active={props.route} on_close={close_sidenav} />

            <div class="h-full w-full bg-lightPrimary dark:!bg-navy-900">
                <main class="mx-[12px] h-full flex-none transition-all md:pr-2 xl:ml-[313px]">
                    <div class="h-full">
                        <Navbar
                            brand_text={props.route.title()}
                            on_open_sidenav={open_sidenav}
                            {avatar_url}
                            {user_name}
                        />
                        <div class="pt-5 mx-auto mb-auto h-full min-h-[84vh] p-2 md:pr-2">
                            { page }
                        </div>
                    </div>
                </main>
            </div>
        </div>
    }
}
