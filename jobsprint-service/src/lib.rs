pub mod authenticator;
pub mod request_tracing;
pub mod routes;
pub mod startup;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use chrono::TimeDelta;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use jobsprint_application::{
    ForgotPasswordUseCase, LoginUseCase, LogoutUseCase, OtpManager, RefreshTokenUseCase,
    ResetPasswordUseCase, SignupUseCase, VerifyAccountUseCase,
};
use jobsprint_core::{AccountStore, EmailClient, RevocationStore, SecretHasher, TokenService};

use crate::authenticator::Authenticator;
use crate::request_tracing::{make_span_with_request_id, on_request, on_response};
use crate::routes::{
    forgot_password::forgot_password, login::login, logout::logout, refresh_token::refresh_token,
    reset_password::reset_password, signup::signup, verify_account::verify_account,
};

/// The assembled authentication service: one router exposing the session
/// lifecycle, with each route holding exactly the collaborators it needs.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Wire the flows from the given port implementations.
    ///
    /// Stores and services are cheap to clone (pool or `Arc` inside); every
    /// use case receives its own handle.
    pub fn new<S, R, H, T, E>(
        account_store: S,
        revocation_store: R,
        hasher: H,
        token_service: T,
        email_client: E,
        otp_code_ttl: TimeDelta,
    ) -> Self
    where
        S: AccountStore + Clone + 'static,
        R: RevocationStore + Clone + 'static,
        H: SecretHasher + Clone + 'static,
        T: TokenService + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let otp_manager = OtpManager::new(account_store.clone(), hasher.clone(), otp_code_ttl);

        let router = Router::new()
            .route("/auth/signup", post(signup::<S, H, E>))
            .with_state(SignupUseCase::new(
                account_store.clone(),
                hasher.clone(),
                otp_manager.clone(),
                email_client.clone(),
            ))
            .route("/auth/verifyAccount", post(verify_account::<S, H>))
            .with_state(VerifyAccountUseCase::new(
                account_store.clone(),
                otp_manager.clone(),
            ))
            .route("/auth/login", post(login::<S, H, T>))
            .with_state(LoginUseCase::new(
                account_store.clone(),
                hasher.clone(),
                token_service.clone(),
            ))
            .route("/auth/genRefreshToken", get(refresh_token::<S, R, T>))
            .with_state(RefreshTokenUseCase::new(
                account_store.clone(),
                revocation_store.clone(),
                token_service.clone(),
            ))
            .route("/auth/logout", get(logout::<S, R, T>))
            .with_state((
                Authenticator::new(
                    account_store.clone(),
                    revocation_store.clone(),
                    token_service.clone(),
                ),
                LogoutUseCase::new(revocation_store, token_service),
            ))
            .route("/auth/forgetPassword", post(forgot_password::<S, H, E>))
            .with_state(ForgotPasswordUseCase::new(
                account_store.clone(),
                otp_manager.clone(),
                email_client,
            ))
            .route("/auth/resetPassword", post(reset_password::<S, H>))
            .with_state(ResetPasswordUseCase::new(account_store, hasher, otp_manager));

        Self { router }
    }

    /// Finish the router with tracing and, when origins are given, CORS.
    pub fn into_router(self, allowed_origins: Option<Vec<String>>) -> Router {
        let router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );

        match allowed_origins {
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect();

                let cors = CorsLayer::new()
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any)
                    .allow_origin(AllowOrigin::list(origins));

                router.layer(cors)
            }
            None => router,
        }
    }

    pub async fn run(
        self,
        listener: TcpListener,
        allowed_origins: Option<Vec<String>>,
    ) -> std::io::Result<()> {
        axum::serve(listener, self.into_router(allowed_origins)).await
    }
}
