use std::io;

use async_std::task;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use tide::{
    http::{mime, Cookie},
    Body, Redirect, Request, Response, StatusCode,
};

use crate::domain::{
    self,
    db::Db,
    session::{SessionToken, SessionTokens},
    Credentials, PublicUser, Registration,
};

pub const TOKEN_COOKIE: &str = "token";
pub const LOGIN_SUCCESS: &str = "login successfull";
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

const INDEX_PAGE: &str = include_str!("../templates/index.html");
const LOGIN_PAGE: &str = include_str!("../templates/login.html");

/// Everything the handlers share, built once at startup.
#[derive(Clone)]
pub struct State<D> {
    pub db: D,
    pub tokens: SessionTokens,
}

pub fn app<D>(state: State<D>, public_dir: &str) -> io::Result<tide::Server<State<D>>>
where
    D: Db + Clone + Send + Sync + 'static,
{
    let mut app = tide::with_state(state);
    app.at("/").get(index::<D>);
    app.at("/create").post(create::<D>);
    app.at("/login").get(login_page::<D>).post(login::<D>);
    app.at("/logout").get(logout::<D>);
    app.at("/").serve_dir(public_dir)?;
    Ok(app)
}

pub async fn index<D>(_req: Request<State<D>>) -> tide::Result {
    Ok(page(INDEX_PAGE))
}

pub async fn login_page<D>(_req: Request<State<D>>) -> tide::Result {
    Ok(page(LOGIN_PAGE))
}

pub async fn create<D>(mut req: Request<State<D>>) -> tide::Result
where
    D: Db + Clone + Send + Sync + 'static,
{
    let registration: Registration = read_body(&mut req).await?;
    let state = req.state().clone();

    // argon2 and sled block, keep them off the executor
    let registered =
        task::spawn_blocking(move || domain::register(&state.db, &state.tokens, registration))
            .await;
    let (user, token) = registered.map_err(|e| {
        error!("registration failed: {e}");
        e
    })?;
    info!("registered user {:?} <{}>", user.id, user.email);

    let mut res = Response::builder(StatusCode::Ok)
        .body(Body::from_json(&PublicUser::from(&user))?)
        .build();
    res.insert_cookie(token_cookie(token));
    Ok(res)
}

pub async fn login<D>(mut req: Request<State<D>>) -> tide::Result
where
    D: Db + Clone + Send + Sync + 'static,
{
    let credentials: Credentials = read_body(&mut req).await?;
    let email = credentials.email.clone();
    let state = req.state().clone();

    let logged_in =
        task::spawn_blocking(move || domain::login(&state.db, &state.tokens, &credentials)).await;
    match logged_in {
        Ok(token) => {
            info!("login for <{email}>");
            let mut res = Response::builder(StatusCode::Ok)
                .body(LOGIN_SUCCESS)
                .build();
            res.insert_cookie(token_cookie(token));
            Ok(res)
        }
        Err(e) if e.is_rejection() => {
            warn!("login refused for <{email}>: {e}");
            Ok(Response::builder(StatusCode::Unauthorized)
                .body(INVALID_CREDENTIALS)
                .build())
        }
        Err(e) => {
            error!("login failed for <{email}>: {e}");
            Err(tide::Error::new(StatusCode::InternalServerError, e))
        }
    }
}

pub async fn logout<D>(_req: Request<State<D>>) -> tide::Result {
    let mut res: Response = Redirect::new("/").into();
    res.insert_cookie(removal_cookie());
    Ok(res)
}

/// Decodes JSON bodies by content type and falls back to url-encoded forms.
async fn read_body<T: DeserializeOwned, S>(req: &mut Request<S>) -> tide::Result<T> {
    let is_json = req
        .content_type()
        .map_or(false, |m| m.essence() == mime::JSON.essence());

    if is_json {
        req.body_json().await
    } else {
        req.body_form().await
    }
}

fn page(html: &'static str) -> Response {
    Response::builder(StatusCode::Ok)
        .body(html)
        .content_type(mime::HTML)
        .build()
}

fn token_cookie(token: SessionToken) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token.into_string())
        .path("/")
        .http_only(true)
        .finish()
}

// Inserted rather than removed: tide only emits a removal for cookies the
// request carried, and logout must clear it either way.
fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}
