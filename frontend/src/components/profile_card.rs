use chrono::{DateTime, Utc};
use mailadmin_shared::models::SuperEmail;
use yew::prelude::*;

use crate::components::card::Card;

/// Last-sync line shown under the profile. `—` when the mailbox was never pulled.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%d/%m/%Y %H:%M:%S").to_string(),
        None => "—".to_string(),
    }
}

#[derive(Properties, PartialEq)]
pub struct ProfileCardProps {
    pub profile: Option<SuperEmail>,
    #[prop_or_default]
    pub last_pull_at: Option<DateTime<Utc>>,
    #[prop_or_default]
    pub loading: bool,
}

#[function_component(ProfileCard)]
pub fn profile_card(props: &ProfileCardProps) -> Html {
    if props.loading {
        return html! {
            <Card extra="profile-card items-center p-4">
                <div class="skeleton skeleton-banner h-32 w-full rounded-xl"></div>
                <div class="skeleton skeleton-avatar -mt-11 h-[87px] w-[87px] rounded-full"></div>
                <div class="skeleton skeleton-line mt-4 h-5 w-40"></div>
                <div class="skeleton skeleton-line mt-2 h-4 w-56"></div>
            </Card>
        };
    }

    let Some(profile) = &props.profile else {
        return html! {
            <Card extra="profile-card items-center p-4">
                <div class="empty-state">
                    <p>{ "No profile data available." }</p>
                </div>
            </Card>
        };
    };

    let avatar = if profile.picture.is_empty() {
        html! {
            <div class="avatar avatar-fallback flex h-[87px] w-[87px] items-center justify-center rounded-full text-3xl font-bold">
                { profile.initial() }
            </div>
        }
    } else {
        html! {
            <img class="avatar h-full w-full rounded-full" src={profile.picture.clone()} alt={profile.name.clone()}
                referrerpolicy="no-referrer" />
        }
    };

    html! {
        <Card extra="profile-card items-center p-4">
            <div class="profile-banner relative mt-1 flex h-32 w-full justify-center rounded-xl bg-cover">
                <div class="absolute -bottom-12 flex h-[87px] w-[87px] items-center justify-center rounded-full border-[4px] border-white dark:border-navy-700">
                    { avatar }
                </div>
            </div>

            <div class="mt-16 flex flex-col items-center">
                <h4 class="text-xl font-bold">{ profile.name.clone() }</h4>
                <p class="text-base font-normal text-gray-600">{ profile.email.clone() }</p>
            </div>

            <div class="mt-6 mb-3 flex flex-col items-center">
                <p class="text-sm text-gray-600">{ "Last synced" }</p>
                <p class="last-pull text-lg font-semibold">{ format_timestamp(props.last_pull_at) }</p>
            </div>
        </Card>
    }
}
