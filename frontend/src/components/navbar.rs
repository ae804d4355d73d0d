use yew::prelude::*;

use crate::theme::ThemeContext;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    pub brand_text: AttrValue,
    pub on_open_sidenav: Callback<()>,
    #[prop_or_default]
    pub avatar_url: Option<AttrValue>,
    #[prop_or_default]
    pub user_name: Option<AttrValue>,
}

#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let theme = use_context::<ThemeContext>();

    let open_sidenav = {
        let on_open_sidenav = props.on_open_sidenav.clone();
        Callback::from(move |_: MouseEvent| on_open_sidenav.emit(()))
    };

    let theme_toggle = match theme {
        Some(ctx) => {
            let toggle = ctx.toggle.clone();
            let onclick = Callback::from(move |_: MouseEvent| toggle.emit(()));
            html! {
                <button class="theme-toggle cursor-pointer text-gray-600" {onclick}>
                    { if ctx.theme.is_dark() { "☀" } else { "☾" } }
                </button>
            }
        }
        None => html! {},
    };

    let user_name = props.user_name.clone().unwrap_or_else(|| AttrValue::from("Admin"));
    let avatar = match &props.avatar_url {
        Some(url) => html! {
            <img class="avatar h-10 w-10 rounded-full" src={url.clone()} alt={user_name.clone()}
                referrerpolicy="no-referrer" />
        },
        None => html! {
            <div class="avatar avatar-fallback flex h-10 w-10 items-center justify-center rounded-full">
                { user_name.chars().next().unwrap_or('?').to_string() }
            </div>
        },
    };

    html! {
        <nav class="navbar sticky top-4 flex flex-row flex-wrap items-center justify-between rounded-xl py-2">
            <div>
                <div class="breadcrumb text-sm">
                    { "Pages / " }{ props.brand_text.clone() }
                </div>
                <p class="text-[33px] font-bold capitalize">{ props.brand_text.clone() }</p>
            </div>

            <div class="navbar-actions flex items-center gap-2 rounded-full bg-white px-2 py-2 shadow-xl dark:bg-navy-800">
                <span class="sidenav-toggle cursor-pointer xl:hidden" onclick={open_sidenav}>{ "☰" }</span>
                { theme_toggle }
                <div class="flex items-center gap-2" title={user_name.clone()}>
                    { avatar }
                    <span class="hidden text-sm font-medium md:block">{ user_name.clone() }</span>
                </div>
            </div>
        </nav>
    }
}
