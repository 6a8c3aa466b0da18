//! Integration tests for the Facebook login flows.

use socialaccount::apps::{InMemorySocialAppStore, SocialApp};
use socialaccount::config::{LocaleFn, ProviderSettings, SocialAccountConfig};
use socialaccount::constants::session_keys;
use socialaccount::mocks::{MockedResponse, OAuth2ProviderHarness};
use socialaccount::oauth2::build_login_url;
use socialaccount::session::InMemorySession;
use socialaccount::{
    AuthAction, AuthProcess, EmailAddress, LoginRequest, LoginUrlOptions, OAuth2Provider,
    ProviderError, ProviderRegistry,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry(config: &SocialAccountConfig) -> ProviderRegistry {
    ProviderRegistry::from_config(config).unwrap()
}

fn request() -> LoginRequest {
    LoginRequest::new("https://app.example.com", InMemorySession::new())
}

fn apps() -> InMemorySocialAppStore {
    InMemorySocialAppStore::new().with_app(SocialApp::new(
        "facebook",
        "Facebook",
        "1234567890",
        "fb-secret",
    ))
}

const PROFILE: &str = r#"{
    "id": "630595557",
    "name": "Raymond Penners",
    "first_name": "Raymond",
    "last_name": "Penners",
    "email": "raymond.penners@gmail.com",
    "link": "https://www.facebook.com/raymond.penners",
    "username": "raymond.penners",
    "birthday": "07/17/1973",
    "work": [],
    "timezone": 2,
    "locale": "nl_NL",
    "verified": true,
    "updated_time": "2012-11-30T20:40:33+0000"
}"#;

#[test]
fn test_oauth2_login_flow() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::new().with_query_email(true));
    let facebook = registry.by_id("facebook").unwrap();

    // Step 1: the login button points at the generic login view
    let options = LoginUrlOptions::new()
        .with_process(AuthProcess::Login)
        .with_next("/dashboard/");
    let login_url = facebook.get_login_url(&request(), &options).unwrap();
    assert_eq!(
        login_url,
        build_login_url("/accounts", "facebook", &options).unwrap()
    );

    // Step 2: the login view redirects to Facebook
    let app = facebook.get_app(&apps(), &request()).unwrap();
    let authorize = facebook
        .build_authorization_url(
            &app,
            "https://app.example.com/accounts/facebook/login/callback/",
            "xyz",
            &request(),
            AuthAction::Authenticate,
        )
        .unwrap();
    assert!(authorize.starts_with("https://www.facebook.com/dialog/oauth?"));
    assert!(authorize.contains("client_id=1234567890"));
    assert!(authorize.contains("scope=email"));
    assert!(!authorize.contains("auth_type"));

    // Step 3: the profile response is normalized
    let login = OAuth2ProviderHarness::new(facebook)
        .login(&MockedResponse::ok(PROFILE))
        .unwrap();
    assert_eq!(login.account.uid, "630595557");
    assert_eq!(login.common_fields.username.as_deref(), Some("raymond.penners"));
    assert_eq!(
        login.email_addresses,
        vec![EmailAddress::new("raymond.penners@gmail.com", false, true)]
    );

    let view = facebook.account_view(&login.account);
    assert_eq!(view.to_str(), "Raymond Penners");
    assert_eq!(
        view.profile_url().as_deref(),
        Some("https://www.facebook.com/raymond.penners")
    );
}

#[test]
fn test_reauthentication_redirect_sets_auth_type() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::default());
    let facebook = registry.by_id("facebook").unwrap();
    let app = facebook.get_app(&apps(), &request()).unwrap();

    let url = facebook
        .build_authorization_url(
            &app,
            "https://app.example.com/cb/",
            "s",
            &request(),
            AuthAction::Reauthenticate,
        )
        .unwrap();
    assert!(url.contains("auth_type=reauthenticate"));
}

#[test]
fn test_js_sdk_login_flow_with_reauthentication() {
    init_tracing();
    let config = SocialAccountConfig::new().with_provider(
        "facebook",
        ProviderSettings::new()
            .with_method("js_sdk")
            .with_auth_param("auth_type", "reauthenticate")
            .with_scope(vec!["email".to_string(), "public_profile".to_string()]),
    );
    let registry = registry(&config);
    let provider = registry.by_id("facebook").unwrap();
    let facebook = provider.as_facebook().unwrap();
    let mut request = request().with_language("de-DE");

    // Login button
    let url = provider
        .get_login_url(
            &request,
            &LoginUrlOptions::new()
                .with_next("/after/")
                .with_action(AuthAction::Reauthenticate),
        )
        .unwrap();
    assert_eq!(
        url,
        "javascript:allauth.facebook.login('/after/', 'reauthenticate', 'login')"
    );

    // SDK snippet context
    let ctx = facebook.media_js(&mut request, &apps()).unwrap();
    assert_eq!(ctx.facebook_jssdk_locale, "de_DE");
    let options: serde_json::Value = serde_json::from_str(&ctx.fb_login_options).unwrap();
    assert_eq!(options["scope"], "email,public_profile");
    assert_eq!(options["auth_type"], "reauthenticate");
    let nonce = options["auth_nonce"].as_str().unwrap().to_string();
    assert_eq!(nonce.len(), 32);

    // The rendered snippet reuses the same nonce
    let again = facebook.media_js(&mut request, &apps()).unwrap();
    assert!(again.fb_login_options.contains(&nonce));

    // Client echoes the nonce back; it is accepted once
    assert_eq!(facebook.verify_nonce(&mut request, &nonce), Ok(()));
    assert!(request.session().get(session_keys::FACEBOOK_NONCE).is_none());
    assert_eq!(
        facebook.verify_nonce(&mut request, &nonce),
        Err(ProviderError::NonceMismatch)
    );
}

#[test]
fn test_media_js_serializes_without_secret() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::default());
    let facebook = registry.by_id("facebook").unwrap().as_facebook().unwrap();
    let mut request = request();

    let ctx = facebook.media_js(&mut request, &apps()).unwrap();
    let json = serde_json::to_string(&ctx).unwrap();
    assert!(json.contains("1234567890"));
    assert!(!json.contains("fb-secret"));
    assert_eq!(
        ctx.facebook_channel_url,
        "https://app.example.com/accounts/facebook/channel/"
    );
}

#[test]
fn test_media_js_without_app() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::default());
    let facebook = registry.by_id("facebook").unwrap().as_facebook().unwrap();
    let mut request = request();

    let err = facebook
        .media_js(&mut request, &InMemorySocialAppStore::new())
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("No Facebook app configured"));
}

#[test]
fn test_custom_locale_func_and_base_path() {
    init_tracing();
    let config = SocialAccountConfig::new()
        .with_login_base_path("/social/")
        .with_provider(
            "facebook",
            ProviderSettings::new().with_locale_func(LocaleFn::new(|request| {
                request
                    .query_param("fb_locale")
                    .unwrap_or("es_LA")
                    .to_string()
            })),
        );
    let registry = registry(&config);
    let facebook = registry.by_id("facebook").unwrap().as_facebook().unwrap();

    let mut request = request().with_query_param("fb_locale", "pt_BR");
    let ctx = facebook.media_js(&mut request, &apps()).unwrap();
    assert_eq!(ctx.facebook_jssdk_locale, "pt_BR");
    assert_eq!(
        ctx.facebook_channel_url,
        "https://app.example.com/social/facebook/channel/"
    );
    assert_eq!(
        facebook.get_login_url(&request, &LoginUrlOptions::new()).unwrap(),
        "/social/facebook/login/"
    );
}

#[test]
fn test_invalid_method_is_configuration_error() {
    init_tracing();
    let config = SocialAccountConfig::new()
        .with_provider("facebook", ProviderSettings::new().with_method("oauth1"));
    let registry = registry(&config);
    let facebook = registry.by_id("facebook").unwrap();

    let err = facebook
        .get_login_url(&request(), &LoginUrlOptions::new())
        .unwrap_err();
    assert_eq!(err, ProviderError::UnsupportedLoginMethod("oauth1".to_string()));
    assert!(err.is_configuration_error());

    // An explicit method override still works
    let url = facebook
        .get_login_url(&request(), &LoginUrlOptions::new().with_method("oauth2"))
        .unwrap();
    assert_eq!(url, "/accounts/facebook/login/");
}

#[test]
fn test_profile_without_email() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::default());
    let facebook = registry.by_id("facebook").unwrap();

    let login = OAuth2ProviderHarness::new(facebook)
        .login(&MockedResponse::ok(r#"{"id": "1", "name": "No Mail"}"#))
        .unwrap();
    assert!(login.email_addresses.is_empty());
    assert_eq!(login.common_fields.email, None);
    assert_eq!(login.common_fields.name.as_deref(), Some("No Mail"));
}

#[test]
fn test_profile_fetch_failure() {
    init_tracing();
    let registry = registry(&SocialAccountConfig::default());
    let facebook = registry.by_id("facebook").unwrap();

    let result = OAuth2ProviderHarness::new(facebook)
        .login(&MockedResponse::new(400, r#"{"error": {"message": "bad token"}}"#));
    assert_eq!(result, Err(ProviderError::ProfileFetchFailed { status: 400 }));
}
