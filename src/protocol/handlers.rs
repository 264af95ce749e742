//! Command handlers module for the student registry.
//!
//! Defines a handler per command. Handlers are synchronous and may block on
//! password hashing; the connection handler runs them on the blocking pool.

use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::handlers::{error_to_client_message, error_to_status_code, handle_error};
use crate::error::{AuthError, RegistryError};
use crate::protocol::responses::{self, format_json, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::storage::{Registration, StudentUpdate};
use crate::students::{MigrateResult, StudentService};

/// Dispatches a parsed command to its handler.
///
/// # Arguments
///
/// * `client` - Session state of the connection that sent the command.
/// * `command` - The parsed command.
/// * `service` - Shared student service.
///
/// # Returns
///
/// * `CommandResult` - Status and the response line to send.
pub fn handle_command(
    client: &mut Client,
    command: &Command,
    service: &StudentService,
) -> CommandResult {
    match command {
        Command::QUIT => handle_cmd_quit(client),
        Command::REGISTER(body) => handle_cmd_register(client, body, service),
        Command::LOGIN { email, password } => handle_cmd_login(client, email, password, service),
        Command::AUTH(token) => handle_cmd_auth(client, token, service),
        Command::MALFORMED(reason) => failure(RegistryError::Protocol(reason.clone())),
        Command::UNKNOWN => handle_cmd_unknown(),
        protected => {
            if !client.is_logged_in() {
                return failure(AuthError::NotLoggedIn.into());
            }
            handle_protected(client, protected, service)
        }
    }
}

/// Handles commands that require an authenticated session
fn handle_protected(
    client: &mut Client,
    command: &Command,
    service: &StudentService,
) -> CommandResult {
    match command {
        Command::LOGOUT => handle_cmd_logout(client),
        Command::LIST => respond(service.list_students(), responses::OK),
        Command::GET(id) => respond(service.get_student(*id), responses::OK),
        Command::UPDATE { id, body } => handle_cmd_update(client, *id, body, service),
        Command::DELETE(id) => handle_cmd_delete(client, *id, service),
        Command::MIGRATE => handle_cmd_migrate(client, service),
        _ => handle_cmd_unknown(),
    }
}

fn handle_cmd_quit(client: &mut Client) -> CommandResult {
    client.logout();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::GOODBYE, "Goodbye")),
    }
}

/// Registers a student and logs the session in as them.
fn handle_cmd_register(client: &mut Client, body: &str, service: &StudentService) -> CommandResult {
    let registration = match decode::<Registration>(body) {
        Ok(registration) => registration,
        Err(e) => return failure(e),
    };

    match service.register(registration) {
        Ok(result) => {
            client.login(result.student.email.clone());
            success(format_json(responses::CREATED, &result))
        }
        Err(e) => failure(e),
    }
}

/// Verifies credentials. Every failure is answered with the same message.
fn handle_cmd_login(
    client: &mut Client,
    email: &str,
    password: &str,
    service: &StudentService,
) -> CommandResult {
    match service.login(email, password) {
        Ok(result) => {
            client.login(result.email.clone());
            success(format_json(responses::OK, &result))
        }
        Err(e) => {
            client.logout();
            failure(e)
        }
    }
}

fn handle_cmd_auth(client: &mut Client, token: &str, service: &StudentService) -> CommandResult {
    match service.authenticate_token(token) {
        Ok(email) => {
            info!("Session {} authenticated by token as {}", peer(client), email);
            let message = format!("Authenticated as {}", email);
            client.login(email);
            success(format_response(responses::OK, &message))
        }
        Err(e) => {
            client.logout();
            failure(e)
        }
    }
}

/// Updates a record. A session that renames its own email follows the rename.
fn handle_cmd_update(
    client: &mut Client,
    id: i32,
    body: &str,
    service: &StudentService,
) -> CommandResult {
    let update = match decode::<StudentUpdate>(body) {
        Ok(update) => update,
        Err(e) => return failure(e),
    };

    let own = is_own_record(client, id, service);
    match service.update_student(id, update) {
        Ok(view) => {
            if own && client.identity() != Some(view.email.as_str()) {
                info!("Session {} now authenticated as {}", peer(client), view.email);
                client.login(view.email.clone());
            }
            success(format_json(responses::OK, &view))
        }
        Err(e) => failure(e),
    }
}

/// Deletes a record. Deleting the session's own record logs it out.
fn handle_cmd_delete(client: &mut Client, id: i32, service: &StudentService) -> CommandResult {
    let own = is_own_record(client, id, service);
    match service.delete_student(id) {
        Ok(()) => {
            if own {
                info!("Session {} deleted its own record", peer(client));
                client.logout();
            }
            success(format_response(responses::OK, "Student deleted successfully"))
        }
        Err(e) => failure(e),
    }
}

fn handle_cmd_logout(client: &mut Client) -> CommandResult {
    if let Some(email) = client.identity() {
        info!("Student {} logged out from {}", email, peer(client));
    }
    client.logout();
    success(format_response(responses::OK, "Logged out"))
}

fn handle_cmd_migrate(client: &Client, service: &StudentService) -> CommandResult {
    info!(
        "Password migration requested by {}",
        client.identity().unwrap_or("unknown")
    );
    match service.migrate_passwords() {
        Ok(report) => success(format_json(responses::OK, &MigrateResult::from(&report))),
        Err(e) => failure(e),
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(format_response(responses::INTERNAL_ERROR, "Unknown command")),
    }
}

fn is_own_record(client: &Client, id: i32, service: &StudentService) -> bool {
    match (client.identity(), service.get_student(id)) {
        (Some(identity), Ok(view)) => view.email == identity,
        _ => false,
    }
}

fn peer(client: &Client) -> String {
    client
        .client_addr()
        .map_or_else(|| "unknown".to_string(), |addr| addr.to_string())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RegistryError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        RegistryError::Protocol(format!("Invalid JSON body: {}", e))
    })
}

fn respond<T: serde::Serialize>(result: Result<T, RegistryError>, code: u16) -> CommandResult {
    match result {
        Ok(payload) => success(format_json(code, &payload)),
        Err(e) => failure(e),
    }
}

fn success(message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(message),
    }
}

fn failure(err: RegistryError) -> CommandResult {
    handle_error(&err);
    let text = error_to_client_message(&err);
    CommandResult {
        message: Some(format_response(error_to_status_code(&err), &text)),
        status: CommandStatus::Failure(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BcryptHasher;
    use crate::protocol::parse_command;
    use crate::storage::{InMemoryStore, RecordStore, Student};
    use crate::token::JwtIssuer;
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> (Arc<InMemoryStore>, StudentService) {
        let legacy = Student {
            id: None,
            name: "Old".into(),
            email: "old@x.io".into(),
            secret: "secret123".into(),
            course: "History".into(),
        };
        let store = Arc::new(InMemoryStore::with_students(vec![legacy]).unwrap());
        let service = StudentService::new(
            store.clone(),
            Arc::new(BcryptHasher::new(4)),
            Arc::new(JwtIssuer::new("handler-test-secret-00", Duration::from_secs(60))),
            254,
        );
        (store, service)
    }

    fn run(client: &mut Client, line: &str, service: &StudentService) -> String {
        handle_command(client, &parse_command(line), service)
            .message
            .unwrap_or_default()
    }

    #[test]
    fn test_protected_commands_require_login() {
        let (_, service) = service();
        let mut client = Client::default();
        for line in ["LIST", "GET 1", "DELETE 1", "MIGRATE", "LOGOUT", "UPDATE 1 {}"] {
            assert_eq!(run(&mut client, line, &service), "401 Not logged in\r\n", "{line}");
        }
    }

    #[test]
    fn test_register_logs_session_in() {
        let (_, service) = service();
        let mut client = Client::default();
        let response = run(
            &mut client,
            r#"REGISTER {"name":"Ada","email":"ada@x.io","password":"pw","course":"CS"}"#,
            &service,
        );

        assert!(response.starts_with("201 {"), "{response}");
        assert!(response.contains("\"token\""));
        assert!(!response.contains("password"));
        assert_eq!(client.identity(), Some("ada@x.io"));
    }

    #[test]
    fn test_register_errors() {
        let (_, service) = service();
        let mut client = Client::default();

        let response = run(&mut client, r#"REGISTER {"email":"ada@x.io","password":""}"#, &service);
        assert_eq!(response, "400 Password cannot be empty\r\n");

        let response = run(&mut client, r#"REGISTER {"email":"old@x.io","password":"pw"}"#, &service);
        assert_eq!(response, "409 Email already registered\r\n");

        let response = run(&mut client, "REGISTER not-json", &service);
        assert!(response.starts_with("400 Invalid JSON body"));
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_login_migrates_legacy_account() {
        let (store, service) = service();
        let mut client = Client::default();

        let response = run(&mut client, "LOGIN old@x.io secret123", &service);
        assert!(response.starts_with("200 {"), "{response}");
        assert!(client.is_logged_in());

        let secret = store.find_by_email("old@x.io").unwrap().unwrap().secret;
        assert!(secret.starts_with("$2b$"));
    }

    #[test]
    fn test_failed_logins_share_one_response() {
        let (_, service) = service();
        let mut client = Client::default();

        let wrong = run(&mut client, "LOGIN old@x.io nope", &service);
        let unknown = run(&mut client, "LOGIN ghost@x.io nope", &service);
        let empty = run(&mut client, "LOGIN old@x.io", &service);
        assert_eq!(wrong, "401 Invalid credentials\r\n");
        assert_eq!(unknown, wrong);
        assert_eq!(empty, wrong);
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_auth_with_token_from_login() {
        let (_, service) = service();
        let mut first = Client::default();
        let response = run(&mut first, "LOGIN old@x.io secret123", &service);
        let json: serde_json::Value =
            serde_json::from_str(response.trim_start_matches("200 ").trim()).unwrap();
        let token = json["token"].as_str().unwrap().to_string();

        let mut second = Client::default();
        let response = run(&mut second, &format!("AUTH {token}"), &service);
        assert_eq!(response, "200 Authenticated as old@x.io\r\n");
        assert!(second.is_logged_in());

        let response = run(&mut second, "AUTH bogus", &service);
        assert_eq!(response, "401 Invalid token\r\n");
        assert!(!second.is_logged_in());
    }

    #[test]
    fn test_crud_flow() {
        let (_, service) = service();
        let mut client = Client::default();
        run(&mut client, "LOGIN old@x.io secret123", &service);

        let list = run(&mut client, "LIST", &service);
        assert!(list.starts_with("200 [{"), "{list}");
        assert!(!list.contains("secret"));

        let updated = run(&mut client, r#"UPDATE 1 {"course":"Maths"}"#, &service);
        assert!(updated.contains("\"course\":\"Maths\""), "{updated}");

        assert_eq!(run(&mut client, "GET 99", &service), "404 Student not found\r\n");
        assert_eq!(
            run(&mut client, "DELETE 1", &service),
            "200 Student deleted successfully\r\n"
        );
        assert!(!client.is_logged_in());
        assert_eq!(run(&mut client, "DELETE 1", &service), "401 Not logged in\r\n");
    }

    #[test]
    fn test_session_follows_own_email_change() {
        let (_, service) = service();
        let mut client = Client::default();
        run(&mut client, "LOGIN old@x.io secret123", &service);

        let updated = run(&mut client, r#"UPDATE 1 {"email":"renamed@x.io"}"#, &service);
        assert!(updated.contains("\"email\":\"renamed@x.io\""), "{updated}");
        assert_eq!(client.identity(), Some("renamed@x.io"));

        let response = run(&mut client, "LOGIN renamed@x.io secret123", &service);
        assert!(response.starts_with("200 {"), "{response}");
    }

    #[test]
    fn test_changes_to_other_records_keep_session() {
        let (_, service) = service();
        let mut client = Client::default();
        run(
            &mut client,
            r#"REGISTER {"name":"Ada","email":"ada@x.io","password":"pw","course":"CS"}"#,
            &service,
        );

        run(&mut client, r#"UPDATE 1 {"email":"moved@x.io"}"#, &service);
        assert_eq!(client.identity(), Some("ada@x.io"));

        assert_eq!(
            run(&mut client, "DELETE 1", &service),
            "200 Student deleted successfully\r\n"
        );
        assert_eq!(client.identity(), Some("ada@x.io"));
        assert_eq!(run(&mut client, "GET 1", &service), "404 Student not found\r\n");
    }

    #[test]
    fn test_migrate_reports_counts() {
        let (_, service) = service();
        let mut client = Client::default();
        run(
            &mut client,
            r#"REGISTER {"name":"Ada","email":"ada@x.io","password":"pw","course":"CS"}"#,
            &service,
        );

        let response = run(&mut client, "MIGRATE", &service);
        assert!(response.contains("\"migrated\":1"), "{response}");
        assert!(response.contains("\"skipped\":1"), "{response}");
        assert!(response.contains("\"failed\":0"), "{response}");
    }

    #[test]
    fn test_quit_and_unknown() {
        let (_, service) = service();
        let mut client = Client::default();

        let result = handle_command(&mut client, &Command::QUIT, &service);
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.message.as_deref(), Some("221 Goodbye\r\n"));

        assert_eq!(run(&mut client, "BADCMD", &service), "500 Unknown command\r\n");
        assert_eq!(
            run(&mut client, "GET x", &service),
            "400 GET requires a numeric student id\r\n"
        );
    }
}
