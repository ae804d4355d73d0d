use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::{Route, SIDEBAR_ROUTES};

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub open: bool,
    pub active: Route,
    pub on_close: Callback<()>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <aside class={classes!(
            "sidebar", "fixed", "flex", "min-h-full", "flex-col", "bg-white", "pb-10", "shadow-2xl",
            "dark:bg-navy-800", "dark:text-white",
            if props.open { "translate-x-0" } else { "-translate-x-96" }
        )}>
            <span class="sidebar-close absolute top-4 right-4 cursor-pointer xl:hidden" onclick={on_close}>
                { "✕" }
            </span>

            <div class="sidebar-brand mx-8 mt-10 flex items-center gap-3">
                <div class="brand-badge flex h-10 w-10 items-center justify-center rounded-xl">
                    <svg width="22" height="22" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg">
                        <path d="M12 3L2 8.5L12 14L22 8.5L12 3Z" fill="white" opacity="0.9" />
                        <path d="M2 12L12 17.5L22 12" stroke="white" stroke-width="1.8" stroke-linecap="round" stroke-linejoin="round" />
                    </svg>
                </div>
                <div class="flex flex-col leading-tight">
                    <span class="text-base font-extrabold uppercase">{ "Virtual" }</span>
                    <span class="text-brand-500 text-sm font-semibold uppercase">{ "Academic Assistant" }</span>
                </div>
            </div>

            <div class="my-7 h-px bg-gray-300 dark:bg-white/30"></div>

            <ul class="sidebar-links mb-auto pt-1">
                { for SIDEBAR_ROUTES.iter().map(|(route, name)| {
                    let active = *route == props.active;
                    html! {
                        <li class={classes!("sidebar-link", active.then_some("active"))}>
                            <Link<Route> to={*route}>
                                { *name }
                            </Link<Route>>
                        </li>
                    }
                })}
            </ul>
        </aside>
    }
}
