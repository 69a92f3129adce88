//! User-facing messages
//!
//! Every string the presentation layer may display lives here so that the
//! request pipeline never leaks provider or storage detail to the user.

/// Ingredient text shorter than the minimum length
pub const INGREDIENTS_TOO_SHORT: &str = "Voer minimaal 3 tekens in.";

/// Form submitted without an ingredients field
pub const VALIDATION_FAILED: &str = "Validatie mislukt.";

/// Any failure of the generative flow
pub const GENERATION_FAILED: &str =
    "Er is iets misgegaan bij het genereren van het recept. Probeer het later opnieuw.";

/// Save attempted without a (non-anonymous) identity
pub const LOGIN_REQUIRED_TO_SAVE: &str = "Je moet ingelogd zijn om een recept op te slaan.";

/// Favorite write failed for a non-authorization reason
pub const SAVE_FAILED: &str = "Kon het recept niet opslaan.";

/// Favorite write rejected by the store's access rules
pub const SAVE_NOT_PERMITTED: &str = "Je hebt geen toestemming om dit recept op te slaan.";

/// Favorites requested without a (non-anonymous) identity
pub const LOGIN_REQUIRED_TO_VIEW: &str = "Log in om je favoriete recepten te bekijken.";

/// Favorites could not be read
pub const FAVORITES_LOAD_FAILED: &str = "Kon je favorieten niet laden. Probeer het later opnieuw.";

/// No identity could be created for the session
pub const IDENTITY_UNAVAILABLE: &str = "Opslaan is momenteel niet beschikbaar.";
