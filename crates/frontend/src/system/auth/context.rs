use contracts::system::auth::{UserInfo, LOGIN_PATH};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};
use crate::layout::global_context::replace_url;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

impl AuthState {
    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().map(|u| u.is_admin()).unwrap_or(false)
    }

    /// Admin or DataEntry
    pub fn can_edit(&self) -> bool {
        self.user_info
            .as_ref()
            .map(|u| u.can_edit_directory())
            .unwrap_or(false)
    }
}

/// Provides the auth state and restores a stored session on mount
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    Effect::new(move |_| {
        spawn_local(async move {
            let Some(access_token) = storage::get_access_token() else {
                return;
            };
            match api::get_current_user(&access_token).await {
                Ok(user_info) => set_auth_state.set(AuthState {
                    access_token: Some(access_token),
                    user_info: Some(user_info),
                }),
                Err(_) => restore_with_refresh(set_auth_state).await,
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

async fn restore_with_refresh(set_auth_state: WriteSignal<AuthState>) {
    let Some(refresh_token) = storage::get_refresh_token() else {
        storage::clear_tokens();
        return;
    };
    match api::refresh_token(refresh_token).await {
        Ok(response) => {
            storage::save_access_token(&response.access_token);
            if let Ok(user_info) = api::get_current_user(&response.access_token).await {
                set_auth_state.set(AuthState {
                    access_token: Some(response.access_token),
                    user_info: Some(user_info),
                });
            }
        }
        Err(e) => {
            log::warn!("Session refresh failed: {}", e);
            storage::clear_tokens();
        }
    }
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Store the tokens of a successful login and switch to the console
pub fn complete_login(set_auth_state: WriteSignal<AuthState>, response: contracts::system::auth::LoginResponse) {
    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("{}", e);
        }
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
    replace_url(LOGIN_PATH);
}
