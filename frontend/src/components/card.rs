use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CardProps {
    #[prop_or_default]
    pub extra: Classes,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(Card)]
pub fn card(props: &CardProps) -> Html {
    html! {
        <div class={classes!(
            "card", "relative", "flex", "flex-col", "rounded-3xl", "bg-white", "shadow-md",
            "dark:bg-navy-800", "dark:text-white",
            props.extra.clone()
        )}>
            { props.children.clone() }
        </div>
    }
}
