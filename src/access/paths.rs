// Route literals used by the access policy and the request gate.
// A route renamed here is renamed for the policy table and the redirects at once.

pub const HOME: &str = "/";

// --- Gateway pages ---
pub const SIGN_IN: &str = "/signin";
pub const REGISTER: &str = "/register";
pub const FORGOT_PASSWORD: &str = "/forgot-password";
pub const UNAUTHORIZED: &str = "/unauthorized";

/// Query parameter carrying the originally requested location on the sign-in redirect.
pub const CALLBACK_PARAM: &str = "callbackUrl";

// --- Service endpoints ---
pub const HEALTH: &str = "/health";
pub const AUTH_API: &str = "/api/auth";
pub const SESSION_API: &str = "/api/session";
pub const ACCESS_API: &str = "/api/access";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const API_DOCS: &str = "/api-docs";

// --- Shared authenticated pages ---
pub const PROFILE: &str = "/profile";
pub const SETTINGS: &str = "/settings";
pub const NOTIFICATIONS: &str = "/notifications";

// --- Admissions ---
pub const BIO_DATA: &str = "/bio-data";
pub const DOCUMENTS: &str = "/documents";
pub const PAYMENTS: &str = "/payments";
pub const ADMISSION_LETTER: &str = "/admission-letter";
pub const ADMISSIONS: &str = "/admissions";

// --- Learning ---
pub const STUDENT: &str = "/student";
pub const TEACHER: &str = "/teacher";
pub const QUIZ: &str = "/quiz";
pub const QUIZ_RESULTS: &str = "/quiz/results";
pub const QUIZ_MANAGE: &str = "/quiz/manage";
pub const LESSONS: &str = "/lessons";
pub const LESSON_ASSISTANT: &str = "/lesson-assistant";
pub const QURAN: &str = "/quran";
pub const WORD_CLOUD: &str = "/word-cloud";
