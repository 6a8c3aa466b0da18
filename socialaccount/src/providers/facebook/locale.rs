//! Mapping of request languages onto Facebook JS-SDK locales.

use crate::config::LocaleFn;
use crate::request::LoginRequest;

/// Locale used when the request language has no Facebook counterpart.
pub const FALLBACK_LOCALE: &str = "en_US";

/// Locales supported by the Facebook JS SDK.
///
/// For languages with several regions, the first entry is the default
/// region for that language.
const FACEBOOK_LOCALES: &[&str] = &[
    "af_ZA", "ar_AR", "az_AZ", "be_BY", "bg_BG", "bn_IN", "bs_BA", "ca_ES", "cs_CZ", "cy_GB",
    "da_DK", "de_DE", "el_GR", "en_US", "en_GB", "en_PI", "en_UD", "eo_EO", "es_ES", "es_LA",
    "et_EE", "eu_ES", "fa_IR", "fb_LT", "fi_FI", "fo_FO", "fr_FR", "fr_CA", "fy_NL", "ga_IE",
    "gl_ES", "he_IL", "hi_IN", "hr_HR", "hu_HU", "hy_AM", "id_ID", "is_IS", "it_IT", "ja_JP",
    "ka_GE", "km_KH", "ko_KR", "ku_TR", "la_VA", "lt_LT", "lv_LV", "mk_MK", "ml_IN", "ms_MY",
    "nb_NO", "ne_NP", "nl_NL", "nn_NO", "pa_IN", "pl_PL", "ps_AF", "pt_BR", "pt_PT", "ro_RO",
    "ru_RU", "sk_SK", "sl_SI", "sq_AL", "sr_RS", "sv_SE", "sw_KE", "ta_IN", "te_IN", "th_TH",
    "tl_PH", "tr_TR", "uk_UA", "vi_VN", "zh_CN", "zh_HK", "zh_TW",
];

/// Map a language tag (`nl`, `en-gb`, `pt_BR`) onto a Facebook locale.
///
/// An exact language/region match wins. A language-only match, or a
/// region Facebook does not support, yields the language's default region.
/// Unknown languages yield `None`.
///
/// # Examples
///
/// ```
/// use socialaccount::providers::facebook::locale::facebook_locale_for;
///
/// assert_eq!(facebook_locale_for("en-gb").as_deref(), Some("en_GB"));
/// assert_eq!(facebook_locale_for("nl").as_deref(), Some("nl_NL"));
/// assert_eq!(facebook_locale_for("xx"), None);
/// ```
#[must_use]
pub fn facebook_locale_for(language: &str) -> Option<String> {
    let normalized = language.trim().replace('-', "_");
    let (lang, region) = match normalized.split_once('_') {
        Some((lang, region)) => (lang.to_lowercase(), Some(region.to_uppercase())),
        None => (normalized.to_lowercase(), None),
    };

    let mut regions = FACEBOOK_LOCALES
        .iter()
        .filter_map(|locale| locale.split_once('_'))
        .filter(|(l, _)| *l == lang)
        .map(|(_, r)| r);

    let default_region = regions.next()?;
    let chosen = region
        .filter(|wanted| {
            wanted == default_region
                || FACEBOOK_LOCALES.contains(&format!("{lang}_{wanted}").as_str())
        })
        .unwrap_or_else(|| default_region.to_string());

    Some(format!("{lang}_{chosen}"))
}

/// Default locale callable: the request language mapped onto Facebook's
/// locale list, or [`FALLBACK_LOCALE`].
#[must_use]
pub fn default_locale(request: &LoginRequest) -> String {
    request
        .language()
        .and_then(facebook_locale_for)
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

/// [`default_locale`] wrapped as a [`LocaleFn`].
#[must_use]
pub fn default_locale_callable() -> LocaleFn {
    LocaleFn::new(default_locale)
}
