//! The proprietary-service pattern catalog.
//!
//! Each [`PatternRule`] pairs a set of detectors for one proprietary hosted
//! service with a replacement template pointing at a self-hostable
//! open-source substitute, plus a human-readable migration note. The catalog
//! is a flat, ordered registry built once at process start; dispatch is
//! data-driven rather than a hard-coded branch per service.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

/// The service area a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Hosted identity providers (Auth0, Clerk, Firebase Auth).
    Auth,
    /// Hosted model inference (OpenAI, Anthropic).
    Inference,
    /// Hosted vector databases (Pinecone).
    VectorSearch,
    /// Hosted object storage (S3, Google Cloud Storage).
    Storage,
    /// Hosted product analytics (Google Analytics, Mixpanel, Segment).
    Analytics,
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceCategory::Auth => "auth",
            ServiceCategory::Inference => "inference",
            ServiceCategory::VectorSearch => "vector-search",
            ServiceCategory::Storage => "storage",
            ServiceCategory::Analytics => "analytics",
        };
        write!(f, "{}", name)
    }
}

/// One entry in the catalog: detectors for a single proprietary service and
/// the template that replaces whatever they match.
///
/// Detectors within one rule share a single replacement template, so they
/// must all expose the same capture names. A rule never matches the output
/// it produces; the per-rule `example` is used by the tests to verify that
/// re-running the rewriter on its own output yields no new changes.
#[derive(Debug)]
pub struct PatternRule {
    /// Stable identifier, used in change records (e.g. `openai-import`).
    pub id: &'static str,
    /// The proprietary service this rule targets.
    pub service: &'static str,
    /// Which service area the rule covers.
    pub category: ServiceCategory,
    /// Patterns whose matches are replaced through `replace`.
    pub detect: Vec<Regex>,
    /// Regex replacement template; may reference named captures.
    pub replace: String,
    /// Migration note surfaced in the change report.
    pub note: &'static str,
    /// A snippet that triggers this rule.
    pub example: &'static str,
}

/// Builds a rule that swaps a module specifier for an open-source package.
///
/// Covers the four ways a JS/TS project pulls a package in: `import … from`,
/// side-effect `import "x"`, `require(…)`, and dynamic `import(…)`. The
/// `package` argument is a regex fragment so a rule can cover a scope family
/// such as `@auth0/[\w.-]+`.
fn module_swap(
    id: &'static str,
    service: &'static str,
    category: ServiceCategory,
    package: &str,
    replacement: &str,
    note: &'static str,
    example: &'static str,
) -> PatternRule {
    let detect = [
        format!(r#"(?P<head>\bimport\s+[^;'"]*?\bfrom\s*)['"]{package}['"]"#),
        format!(r#"(?P<head>\bimport\s*)['"]{package}['"]"#),
        format!(r#"(?P<head>\brequire\(\s*)['"]{package}['"]"#),
        format!(r#"(?P<head>\bimport\(\s*)['"]{package}['"]"#),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("catalog detector must compile"))
    .collect();

    PatternRule {
        id,
        service,
        category,
        detect,
        replace: format!("${{head}}\"{replacement}\""),
        note,
        example,
    }
}

/// Builds a rule that swaps a dependency entry in a `package.json` manifest.
fn manifest_swap(
    id: &'static str,
    service: &'static str,
    category: ServiceCategory,
    package: &str,
    replacement: &str,
    version: &str,
    note: &'static str,
    example: &'static str,
) -> PatternRule {
    let pattern = format!(r#"(?m)^(?P<indent>\s*)"{}"\s*:\s*"[^"]*""#, regex::escape(package));
    PatternRule {
        id,
        service,
        category,
        detect: vec![Regex::new(&pattern).expect("catalog detector must compile")],
        replace: format!("${{indent}}\"{replacement}\": \"{version}\""),
        note,
        example,
    }
}

/// Builds a rule that swaps a client-construction or call-site snippet.
fn snippet_swap(
    id: &'static str,
    service: &'static str,
    category: ServiceCategory,
    pattern: &str,
    replacement: &str,
    note: &'static str,
    example: &'static str,
) -> PatternRule {
    PatternRule {
        id,
        service,
        category,
        detect: vec![Regex::new(pattern).expect("catalog detector must compile")],
        replace: replacement.to_string(),
        note,
        example,
    }
}

fn build_catalog() -> Vec<PatternRule> {
    vec![
        // AI inference
        module_swap(
            "openai-import",
            "OpenAI",
            ServiceCategory::Inference,
            "openai",
            "ollama",
            "OpenAI SDK imports now resolve to the Ollama client; point OLLAMA_HOST at your own inference server.",
            r#"import OpenAI from 'openai';"#,
        ),
        snippet_swap(
            "openai-client",
            "OpenAI",
            ServiceCategory::Inference,
            r"\bnew\s+OpenAI\s*\(",
            "new Ollama(",
            "OpenAI client construction replaced with an Ollama client; API keys are not required for a local server.",
            r#"const client = new OpenAI({ apiKey: process.env.OPENAI_API_KEY });"#,
        ),
        manifest_swap(
            "openai-manifest",
            "OpenAI",
            ServiceCategory::Inference,
            "openai",
            "ollama",
            "^0.5.16",
            "Dependency on the OpenAI SDK replaced with the Ollama client library; merge duplicate entries if several AI SDKs were replaced.",
            "  \"openai\": \"^4.52.0\"",
        ),
        module_swap(
            "anthropic-import",
            "Anthropic",
            ServiceCategory::Inference,
            "@anthropic-ai/sdk",
            "ollama",
            "Anthropic SDK imports now resolve to the Ollama client; chat-completion call sites need their message shape reviewed.",
            r#"import Anthropic from '@anthropic-ai/sdk';"#,
        ),
        snippet_swap(
            "anthropic-client",
            "Anthropic",
            ServiceCategory::Inference,
            r"\bnew\s+Anthropic\s*\(",
            "new Ollama(",
            "Anthropic client construction replaced with an Ollama client.",
            r#"const anthropic = new Anthropic({ apiKey: process.env.ANTHROPIC_API_KEY });"#,
        ),
        manifest_swap(
            "anthropic-manifest",
            "Anthropic",
            ServiceCategory::Inference,
            "@anthropic-ai/sdk",
            "ollama",
            "^0.5.16",
            "Dependency on the Anthropic SDK replaced with the Ollama client library; merge duplicate entries if several AI SDKs were replaced.",
            "  \"@anthropic-ai/sdk\": \"^0.24.0\"",
        ),
        // Vector search
        module_swap(
            "pinecone-import",
            "Pinecone",
            ServiceCategory::VectorSearch,
            "@pinecone-database/pinecone",
            "@qdrant/js-client-rest",
            "Pinecone imports now resolve to the Qdrant REST client; run Qdrant locally or point QDRANT_URL at your own cluster.",
            r#"import { Pinecone } from '@pinecone-database/pinecone';"#,
        ),
        snippet_swap(
            "pinecone-client",
            "Pinecone",
            ServiceCategory::VectorSearch,
            r"\bnew\s+Pinecone\s*\(",
            "new QdrantClient(",
            "Pinecone client construction replaced with a Qdrant client; index operations map onto Qdrant collections.",
            r#"const pc = new Pinecone({ apiKey: process.env.PINECONE_API_KEY });"#,
        ),
        manifest_swap(
            "pinecone-manifest",
            "Pinecone",
            ServiceCategory::VectorSearch,
            "@pinecone-database/pinecone",
            "@qdrant/js-client-rest",
            "^1.9.0",
            "Dependency on the Pinecone SDK replaced with the Qdrant REST client.",
            "  \"@pinecone-database/pinecone\": \"^2.2.0\"",
        ),
        // Auth
        module_swap(
            "auth0-import",
            "Auth0",
            ServiceCategory::Auth,
            r"@auth0/[\w.-]+",
            "keycloak-js",
            "Auth0 SDK imports now resolve to the Keycloak adapter; configure realm and client id against your own Keycloak instance.",
            r#"import { Auth0Provider } from '@auth0/auth0-react';"#,
        ),
        module_swap(
            "clerk-import",
            "Clerk",
            ServiceCategory::Auth,
            r"@clerk/[\w.-]+",
            "keycloak-js",
            "Clerk SDK imports now resolve to the Keycloak adapter; session handling moves to Keycloak tokens.",
            r#"import { ClerkProvider } from '@clerk/nextjs';"#,
        ),
        module_swap(
            "firebase-import",
            "Firebase",
            ServiceCategory::Auth,
            r"firebase(?:/[\w-]+)?",
            "@supabase/supabase-js",
            "Firebase imports now resolve to the Supabase client, which can run entirely self-hosted; auth and storage calls need their API shape reviewed.",
            r#"import { getAuth } from 'firebase/auth';"#,
        ),
        // Storage
        module_swap(
            "s3-import",
            "Amazon S3",
            ServiceCategory::Storage,
            "@aws-sdk/client-s3",
            "minio",
            "S3 SDK imports now resolve to the MinIO client, which speaks the same protocol against a self-hosted server.",
            r#"import { S3Client, PutObjectCommand } from '@aws-sdk/client-s3';"#,
        ),
        module_swap(
            "gcs-import",
            "Google Cloud Storage",
            ServiceCategory::Storage,
            "@google-cloud/storage",
            "minio",
            "Google Cloud Storage imports now resolve to the MinIO client.",
            r#"import { Storage } from '@google-cloud/storage';"#,
        ),
        // Analytics
        snippet_swap(
            "ga-loader",
            "Google Analytics",
            ServiceCategory::Analytics,
            r"https://www\.googletagmanager\.com/gtag/js(?:\?id=[\w-]+)?",
            "https://plausible.io/js/script.js",
            "Google tag loader replaced with the Plausible script; swap the host for your own Plausible deployment.",
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id=G-XXXX"></script>"#,
        ),
        snippet_swap(
            "ga-call",
            "Google Analytics",
            ServiceCategory::Analytics,
            r"\bgtag\(",
            "plausible(",
            "gtag() event calls replaced with plausible(); custom event properties need their shape reviewed.",
            r#"gtag('event', 'sign_up', { method: 'email' });"#,
        ),
        module_swap(
            "mixpanel-import",
            "Mixpanel",
            ServiceCategory::Analytics,
            "mixpanel-browser",
            "posthog-js",
            "Mixpanel imports now resolve to the PostHog browser client, which can run against a self-hosted PostHog.",
            r#"import mixpanel from 'mixpanel-browser';"#,
        ),
        snippet_swap(
            "mixpanel-track",
            "Mixpanel",
            ServiceCategory::Analytics,
            r"\bmixpanel\.track\(",
            "posthog.capture(",
            "mixpanel.track() calls replaced with posthog.capture(); the event payload shape is compatible for flat properties.",
            r#"mixpanel.track('Signed Up', { plan: 'free' });"#,
        ),
        module_swap(
            "segment-import",
            "Segment",
            ServiceCategory::Analytics,
            "@segment/analytics-next",
            "posthog-js",
            "Segment imports now resolve to the PostHog browser client.",
            r#"import { AnalyticsBrowser } from '@segment/analytics-next';"#,
        ),
    ]
}

/// Returns the catalog, built on first use and shared for the process
/// lifetime.
pub fn catalog() -> &'static [PatternRule] {
    static CATALOG: OnceLock<Vec<PatternRule>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}
