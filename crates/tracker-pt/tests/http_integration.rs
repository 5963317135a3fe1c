//! Integration tests for the tracker API client using wiremock
//!
//! The client is blocking, so every call (including building and dropping
//! the client) runs on a blocking thread while the mock server runs on the
//! test runtime.

use serde_json::json;
use std::time::Duration;
use tracker_pt::{
    AccountMemberCaller, AccountMemberRequest, Client, Day, Error, ProjectCaller, ProjectRequest,
    ProjectsRequest,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn base_url(server: &MockServer) -> String {
    format!("{}/services/v5/", server.uri())
}

/// Run `f` with a client for `base` on a blocking thread
async fn with_client<T, F>(base: String, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&Client) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = Client::with_settings(TOKEN, &base, Duration::from_secs(5))
            .expect("client builds");
        f(&client)
    })
    .await
    .expect("blocking task completes")
}

mod projects {
    use super::*;

    #[tokio::test]
    async fn test_get_project_sends_token_and_decodes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/v5/projects/1234"))
            .and(header("X-TrackerToken", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "project",
                "id": 1234,
                "name": "tracker",
                "week_start_day": "Monday",
                "iteration_length": 2,
                "current_velocity": 12
            })))
            .expect(1)
            .mount(&server)
            .await;

        let project = with_client(base_url(&server), |c| c.get_project(1234))
            .await
            .expect("get succeeds");

        assert_eq!(project.id, 1234);
        assert_eq!(project.name, "tracker");
        assert_eq!(project.week_start_day, Some(Day::Monday));
        assert_eq!(project.current_velocity, 12);
    }

    #[tokio::test]
    async fn test_get_project_accepts_null_attributes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/v5/projects/1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "project",
                "id": 1234,
                "name": "tracker",
                "description": null,
                "profile_content": null,
                "start_date": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let project = with_client(base_url(&server), |c| c.get_project(1234))
            .await
            .expect("null attributes decode");

        assert_eq!(project.id, 1234);
        assert_eq!(project.description, "");
        assert_eq!(project.start_date, None);
    }

    #[tokio::test]
    async fn test_new_project_posts_only_set_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/v5/projects"))
            .and(body_json(json!({
                "no_owner": true,
                "name": "tracker",
                "iteration_length": 3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 99,
                "name": "tracker",
                "iteration_length": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ProjectsRequest {
            no_owner: true,
            project: ProjectRequest {
                name: "tracker".to_string(),
                iteration_length: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        let project = with_client(base_url(&server), move |c| c.new_project(&request))
            .await
            .expect("create succeeds");
        assert_eq!(project.id, 99);
    }

    #[tokio::test]
    async fn test_list_projects_single_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/v5/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "one"},
                {"id": 2, "name": "two"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let projects = with_client(base_url(&server), |c| c.list_projects())
            .await
            .expect("list succeeds");
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].name, "two");
    }

    #[tokio::test]
    async fn test_delete_project_accepts_empty_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/services/v5/projects/1234"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        with_client(base_url(&server), |c| c.delete_project(1234))
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn test_delete_missing_project_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/services/v5/projects/1234"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "kind": "error",
                "code": "unfound_resource",
                "error": "The object you tried to access could not be found."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = with_client(base_url(&server), |c| c.delete_project(1234))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::Status {
                status: 404,
                message: "The object you tried to access could not be found.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/services/v5/projects/7"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let err = with_client(base_url(&server), |c| {
            c.update_project(7, &ProjectRequest::default())
        })
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/v5/projects/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = with_client(base_url(&server), |c| c.get_project(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}

mod account_members {
    use super::*;

    #[tokio::test]
    async fn test_new_account_member() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/v5/accounts/1234/memberships"))
            .and(body_json(json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "initials": "JD",
                "admin": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "account_membership",
                "id": 5678,
                "account_id": 1234,
                "admin": true,
                "person": {
                    "kind": "person",
                    "id": 5678,
                    "name": "Jane Doe",
                    "email": "jane@example.com",
                    "initials": "JD",
                    "username": "jane"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = AccountMemberRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            initials: "JD".to_string(),
            admin: true,
            ..Default::default()
        };

        let member = with_client(base_url(&server), move |c| {
            c.new_account_member(1234, &request)
        })
        .await
        .expect("create succeeds");

        assert_eq!(member.person.id, 5678);
        assert_eq!(member.person.username, "jane");
        assert!(member.admin);
    }

    #[tokio::test]
    async fn test_get_account_member_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/v5/accounts/1234/memberships/5678"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = with_client(base_url(&server), |c| c.get_account_member(1234, 5678))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Authentication failed"));
    }
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Nothing listens on the discard port
    let err = with_client("http://127.0.0.1:9/services/v5/".to_string(), |c| {
        c.list_projects()
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}
