use std::process::Command;

#[test]
fn missing_credentials_exit_with_status_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_sip-dial-bridge"))
        .env_clear()
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Twilio SIP Call Test"));
    assert!(stdout.contains(
        "Error: Please set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_PHONE_NUMBER environment variables"
    ));
    assert!(!stdout.contains("Webhook server started"));
}

#[test]
fn blank_credentials_count_as_missing() {
    let output = Command::new(env!("CARGO_BIN_EXE_sip-dial-bridge"))
        .env_clear()
        .env("TWILIO_ACCOUNT_SID", "AC123")
        .env("TWILIO_AUTH_TOKEN", "  ")
        .env("TWILIO_PHONE_NUMBER", "+15550001111")
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error: Please set"));
}

#[test]
fn malformed_settings_still_print_the_banner() {
    let output = Command::new(env!("CARGO_BIN_EXE_sip-dial-bridge"))
        .env_clear()
        .env("WEBHOOK_PORT", "not-a-port")
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let banner = stdout.find("Twilio SIP Call Test").expect("banner printed");
    let error = stdout.find("Error: Configuration error").expect("error printed");
    assert!(banner < error);
}
