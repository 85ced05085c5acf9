use axum::Form;
use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_login::{login_required, permission_required};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::auth::Permission;
use crate::config::Site;
use crate::models::{AuthSession, Backend, Listing, PublicUser};

pub fn router() -> Router {
    let admin = Router::new()
        .route("/admin", get(self::get::admin))
        .route("/admin/update", post(self::post::admin_update))
        .route_layer(permission_required!(Backend, Permission::Admin));

    let submit = Router::new()
        .route("/add", post(self::post::add))
        .route_layer(login_required!(Backend));

    Router::new()
        .route("/", get(self::get::home))
        .route("/tos", get(self::get::tos))
        .route("/link", get(self::get::link))
        .merge(admin)
        .merge(submit)
}

mod post {
    use super::*;

    #[derive(Deserialize)]
    pub struct AddForm {
        pub name: String,
        pub url: String,
        pub description: String,
    }

    pub async fn add(auth: AuthSession, Form(form): Form<AddForm>) -> Result<Response, Error> {
        let user = auth.user.unwrap();
        let backend = auth.backend;

        let listing = backend
            .submit_listing(form.name, form.url, form.description, user.id.clone())
            .await?;
        tracing::info!("Listing {} submitted by user {}", listing.id, user.id);

        // Fire-and-forget: a lost alert never fails the submission.
        if let Some(mailer) = backend.mailer.clone() {
            tokio::spawn(async move {
                mailer
                    .notify_submission(&listing, &user)
                    .await
                    .unwrap_or_else(|err| {
                        tracing::error!("Failed to send submission alert: {}", err);
                    });
            });
        }

        Ok(Redirect::to("/").into_response())
    }

    #[derive(Deserialize)]
    pub struct UpdateForm {
        pub id: String,
        pub action: String,
    }

    pub async fn admin_update(
        auth: AuthSession,
        Form(form): Form<UpdateForm>,
    ) -> Result<Response, Error> {
        let action = form
            .action
            .parse()
            .map_err(|_| Error::UnknownAction(form.action.clone()))?;

        let listing = auth.backend.transition_listing(&form.id, action).await?;
        tracing::info!("Listing {} is now {}", listing.id, listing.status);

        Ok(Redirect::to("/admin").into_response())
    }
}

mod get {
    use super::*;

    #[derive(Serialize)]
    pub struct HomeDto {
        pub site: Site,
        pub user: Option<PublicUser>,
        pub servers: Vec<Listing>,
    }

    pub async fn home(auth: AuthSession) -> Result<Response, Error> {
        let servers = auth.backend.all_listings().await?;
        Ok(Json(HomeDto {
            site: auth.backend.site.clone(),
            user: auth.user.as_ref().map(PublicUser::from),
            servers,
        })
        .into_response())
    }

    pub async fn admin(auth: AuthSession) -> Result<Response, Error> {
        let listings = auth.backend.all_listings().await?;
        Ok(Json(listings).into_response())
    }

    pub async fn tos(auth: AuthSession) -> Response {
        format!(
            "{} Terms of Service\n\nListings are submitted by their communities and \
             moderated by the site administrators. Submissions that break the rules \
             are suspended or banned.",
            auth.backend.site.name
        )
        .into_response()
    }

    pub async fn link(auth: AuthSession) -> Response {
        format!(
            "Link your Discord account at /auth/discord to submit listings as your \
             {} identity.",
            auth.backend.site.name
        )
        .into_response()
    }
}
