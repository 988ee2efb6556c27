use vardirsync_nomad::NomadError;

#[test]
fn api_error_display() {
    let err = NomadError::Api("connection refused".into());
    assert_eq!(err.to_string(), "API request failed: connection refused");
}

#[test]
fn not_found_display() {
    let err = NomadError::NotFound("myapp/a".into());
    assert_eq!(err.to_string(), "variable not found: myapp/a");
}

#[test]
fn conflict_display() {
    let err = NomadError::Conflict("myapp/a".into());
    assert_eq!(err.to_string(), "variable already exists: myapp/a");
}

#[test]
fn auth_failed_display() {
    let err = NomadError::AuthFailed("403 Forbidden".into());
    assert_eq!(err.to_string(), "authentication failed: 403 Forbidden");
}

#[test]
fn config_error_display() {
    let err = NomadError::Config("empty Nomad address".into());
    assert_eq!(err.to_string(), "invalid configuration: empty Nomad address");
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
    let err: NomadError = json_err.into();
    assert!(err.to_string().contains("serialization error"));
}
