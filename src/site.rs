//! Intent builder for a hosted single-page application
//!
//! Turns a resolved [`SiteConfig`] into the ordered resource intents the
//! provisioning engine needs: private buckets behind a CDN with an origin
//! access identity, a DNS-validated certificate, an edge rewrite function,
//! security headers, a DNS alias and two parameters for deploy pipelines.

use crate::error::{Result, SiteError};
use crate::schema::SiteConfig;
use crate::zones::{HostedZone, ZoneLookup};
use declarative::{IntentPlan, ResourceIntent, ResourceKind, attribute, reference};
use serde_json::json;

/// Logical ids of the intents a site plan contains
pub mod ids {
    pub const LOGGING_BUCKET: &str = "loggingBucket";
    pub const ROOT_BUCKET: &str = "rootBucket";
    pub const ORIGIN_ACCESS_IDENTITY: &str = "originAccessIdentity";
    pub const ROOT_BUCKET_POLICY: &str = "rootBucketPolicy";
    pub const HOSTED_ZONE: &str = "importedHostedZone";
    pub const CERTIFICATE: &str = "sslCertificate";
    pub const REWRITE_FUNCTION: &str = "rewriteFunction";
    pub const HEADERS_POLICY: &str = "securityHeadersPolicy";
    pub const DISTRIBUTION: &str = "cloudFrontDistribution";
    pub const ALIAS_RECORD: &str = "aliasRecord";
    pub const BUCKET_NAME_PARAMETER: &str = "assetsBucketNameParameter";
    pub const DISTRIBUTION_ID_PARAMETER: &str = "distributionIdParameter";
}

/// Document served for `/` and for every rewritten directory path
pub const DEFAULT_ROOT_OBJECT: &str = "index.html";

/// HSTS max-age: two years of 365 days
pub const HSTS_MAX_AGE_SECS: u64 = 2 * 365 * 24 * 60 * 60;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'";
const REFERRER_POLICY: &str = "strict-origin-when-cross-origin";
const FRAME_OPTION: &str = "DENY";

/// Build the ordered intent plan for a site
///
/// Fails with [`SiteError::ZoneNotFound`] before building anything when no
/// hosted zone serves `config.domain_name`.
pub fn build(config: &SiteConfig, zones: &dyn ZoneLookup) -> Result<IntentPlan> {
    let zone = zones
        .find(&config.domain_name)
        .ok_or_else(|| SiteError::ZoneNotFound {
            domain: config.domain_name.clone(),
        })?;

    let fqdn = config.fqdn();
    let www = config.alternate_name();
    let stack = config.stack_name();
    log::debug!("building intents for {fqdn} in zone {} ({})", zone.name, zone.id);

    let mut plan = IntentPlan::new();
    plan.push(logging_bucket())?;
    plan.push(root_bucket())?;
    plan.push(origin_access_identity(&fqdn))?;
    plan.push(root_bucket_policy())?;
    plan.push(hosted_zone(zone))?;
    plan.push(certificate(&fqdn, &www))?;
    plan.push(rewrite_function(config))?;
    plan.push(security_headers_policy())?;
    plan.push(distribution(&fqdn, &www))?;
    plan.push(alias_record(&fqdn, &www))?;
    plan.push(parameter(
        ids::BUCKET_NAME_PARAMETER,
        &format!("{stack}-assetsBucketName"),
        ids::ROOT_BUCKET,
        reference(ids::ROOT_BUCKET),
    ))?;
    plan.push(parameter(
        ids::DISTRIBUTION_ID_PARAMETER,
        &format!("{stack}-cfDistId"),
        ids::DISTRIBUTION,
        reference(ids::DISTRIBUTION),
    ))?;

    plan.validate()?;
    Ok(plan)
}

fn logging_bucket() -> ResourceIntent {
    ResourceIntent::new(ids::LOGGING_BUCKET, ResourceKind::Bucket)
        .property("blockPublicAccess", "BLOCK_ALL")
        .property("encryption", "S3_MANAGED")
        .property("enforceSSL", true)
        .property("versioned", true)
        .property("accessControl", "LogDeliveryWrite")
}

fn root_bucket() -> ResourceIntent {
    ResourceIntent::new(ids::ROOT_BUCKET, ResourceKind::Bucket)
        .property(
            "cors",
            json!([{
                "allowedMethods": ["GET", "POST", "PUT", "DELETE"],
                "allowedOrigins": ["*"],
                "allowedHeaders": ["*"],
            }]),
        )
        .property("publicReadAccess", false)
        .property("blockPublicAccess", "BLOCK_ALL")
        .property("encryption", "S3_MANAGED")
        .property("versioned", true)
}

fn origin_access_identity(fqdn: &str) -> ResourceIntent {
    ResourceIntent::new(ids::ORIGIN_ACCESS_IDENTITY, ResourceKind::OriginAccessIdentity)
        .depends_on(ids::ROOT_BUCKET)
        .property("comment", format!("OAI for {fqdn}"))
}

fn root_bucket_policy() -> ResourceIntent {
    let bucket_arn = attribute(ids::ROOT_BUCKET, "arn");
    ResourceIntent::new(ids::ROOT_BUCKET_POLICY, ResourceKind::BucketPolicy)
        .depends_on(ids::ROOT_BUCKET)
        .depends_on(ids::ORIGIN_ACCESS_IDENTITY)
        .property("bucket", reference(ids::ROOT_BUCKET))
        .property("removalPolicy", "DESTROY")
        .property(
            "statements",
            json!([{
                "effect": "Allow",
                "actions": ["s3:GetObject"],
                "resources": [bucket_arn, { "join": [bucket_arn, "/*"] }],
                "principals": [{
                    "canonicalUser": attribute(ids::ORIGIN_ACCESS_IDENTITY, "s3CanonicalUserId"),
                }],
            }]),
        )
}

fn hosted_zone(zone: &HostedZone) -> ResourceIntent {
    ResourceIntent::new(ids::HOSTED_ZONE, ResourceKind::HostedZone)
        .property("lookup", true)
        .property("hostedZoneId", zone.id.clone())
        .property("zoneName", zone.name.clone())
}

fn certificate(fqdn: &str, www: &str) -> ResourceIntent {
    ResourceIntent::new(ids::CERTIFICATE, ResourceKind::Certificate)
        .depends_on(ids::HOSTED_ZONE)
        .property("domainName", fqdn)
        .property("subjectAlternativeNames", json!([www]))
        .property(
            "validation",
            json!({ "method": "DNS", "hostedZone": reference(ids::HOSTED_ZONE) }),
        )
}

fn rewrite_function(config: &SiteConfig) -> ResourceIntent {
    ResourceIntent::new(ids::REWRITE_FUNCTION, ResourceKind::EdgeFunction)
        .property(
            "codePath",
            config.function_asset_path.to_string_lossy().into_owned(),
        )
        .property("runtime", "cloudfront-js-1.0")
        .property("eventType", "viewer-request")
        .property(
            "comment",
            format!("Rewrite directory paths to {DEFAULT_ROOT_OBJECT}"),
        )
}

fn security_headers_policy() -> ResourceIntent {
    ResourceIntent::new(ids::HEADERS_POLICY, ResourceKind::ResponseHeadersPolicy)
        .property("comment", "Security headers response header policy")
        .property(
            "securityHeaders",
            json!({
                "contentSecurityPolicy": {
                    "override": true,
                    "contentSecurityPolicy": CONTENT_SECURITY_POLICY,
                },
                "strictTransportSecurity": {
                    "override": true,
                    "accessControlMaxAgeSec": HSTS_MAX_AGE_SECS,
                    "includeSubdomains": true,
                    "preload": true,
                },
                "contentTypeOptions": { "override": true },
                "referrerPolicy": {
                    "override": true,
                    "referrerPolicy": REFERRER_POLICY,
                },
                "frameOptions": {
                    "override": true,
                    "frameOption": FRAME_OPTION,
                },
            }),
        )
}

fn distribution(fqdn: &str, www: &str) -> ResourceIntent {
    ResourceIntent::new(ids::DISTRIBUTION, ResourceKind::CdnDistribution)
        .depends_on(ids::CERTIFICATE)
        .depends_on(ids::LOGGING_BUCKET)
        .depends_on(ids::ROOT_BUCKET)
        .depends_on(ids::ORIGIN_ACCESS_IDENTITY)
        .depends_on(ids::REWRITE_FUNCTION)
        .depends_on(ids::HEADERS_POLICY)
        .property("domainNames", json!([www, fqdn]))
        .property("certificate", reference(ids::CERTIFICATE))
        .property(
            "logging",
            json!({
                "enabled": true,
                "bucket": reference(ids::LOGGING_BUCKET),
                "includeCookies": true,
            }),
        )
        .property("defaultRootObject", DEFAULT_ROOT_OBJECT)
        .property(
            "defaultBehavior",
            json!({
                "origin": {
                    "type": "s3",
                    "bucket": reference(ids::ROOT_BUCKET),
                    "originAccessIdentity": reference(ids::ORIGIN_ACCESS_IDENTITY),
                },
                "functionAssociations": [{
                    "function": reference(ids::REWRITE_FUNCTION),
                    "eventType": "viewer-request",
                }],
                "viewerProtocolPolicy": "redirect-to-https",
                "responseHeadersPolicy": reference(ids::HEADERS_POLICY),
            }),
        )
}

fn alias_record(fqdn: &str, www: &str) -> ResourceIntent {
    ResourceIntent::new(ids::ALIAS_RECORD, ResourceKind::DnsRecord)
        .depends_on(ids::DISTRIBUTION)
        .depends_on(ids::HOSTED_ZONE)
        .property("recordType", "A")
        .property("recordNames", json!([fqdn, www]))
        .property("zone", reference(ids::HOSTED_ZONE))
        .property(
            "aliasTarget",
            json!({ "distribution": reference(ids::DISTRIBUTION) }),
        )
}

fn parameter(
    id: &str,
    name: &str,
    source: &str,
    value: serde_json::Value,
) -> ResourceIntent {
    ResourceIntent::new(id, ResourceKind::Parameter)
        .depends_on(source)
        .property("parameterName", name)
        .property("stringValue", value)
        .property("type", "String")
}
