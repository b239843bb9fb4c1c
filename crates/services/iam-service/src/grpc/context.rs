//! Request metadata to `RequestContext`.

use tonic::metadata::MetadataMap;
use tonic::{Request, Status};

use domain::{RequestContext, BEARER_TOKEN_PREFIX, TENANT_OVERRIDE_METADATA_KEY};

use crate::service::AuthService;

const AUTHORIZATION: &str = "authorization";

/// Token from an `authorization: Bearer <token>` entry, if present.
pub fn bearer_token(metadata: &MetadataMap) -> Result<Option<String>, Status> {
    let Some(value) = metadata.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| Status::unauthenticated("Invalid authorization header"))?;
    value
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(|token| Some(token.trim().to_string()))
        .ok_or_else(|| Status::unauthenticated("Expected a bearer token"))
}

/// Tenant named by the `x-tenant-id` entry, if present.
pub fn tenant_override(metadata: &MetadataMap) -> Result<Option<i64>, Status> {
    let Some(value) = metadata.get(TENANT_OVERRIDE_METADATA_KEY) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or_else(|| Status::invalid_argument("Invalid tenant id"))
}

pub(crate) async fn resolve<T>(
    auth: &dyn AuthService,
    request: &Request<T>,
) -> Result<RequestContext, Status> {
    let token = bearer_token(request.metadata())?;
    let tenant_id = tenant_override(request.metadata())?;
    auth.resolve_context(token, tenant_id)
        .await
        .map_err(Status::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(entries: &[(&'static str, &'static str)]) -> MetadataMap {
        let mut map = MetadataMap::new();
        for (key, value) in entries {
            map.insert(*key, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_missing_authorization_is_anonymous() {
        assert_eq!(bearer_token(&metadata(&[])).unwrap(), None);
    }

    #[test]
    fn test_bearer_token_extracted() {
        let map = metadata(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(bearer_token(&map).unwrap(), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let map = metadata(&[("authorization", "Basic dXNlcjpwYXNz")]);
        let status = bearer_token(&map).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_tenant_override_parsed() {
        assert_eq!(tenant_override(&metadata(&[])).unwrap(), None);
        assert_eq!(
            tenant_override(&metadata(&[("x-tenant-id", "42")])).unwrap(),
            Some(42)
        );
    }

    #[test]
    fn test_invalid_tenant_override_rejected() {
        for bad in ["abc", "0", "-3"] {
            let status = tenant_override(&metadata(&[("x-tenant-id", bad)])).unwrap_err();
            assert_eq!(status.code(), tonic::Code::InvalidArgument);
        }
    }
}
