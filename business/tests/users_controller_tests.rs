//! User list integration tests against a mock `/usuarios` API.
//!
//! Every test drives a real [`UserListController`] over HTTP with wiremock
//! standing in for the server, so request shapes (paths, bearer header,
//! partial bodies) are checked as well as the cache afterwards.

use uniways_business::{
    AuthContext, BusinessConfig, ListState, NotificationKind, SessionCheck, SortColumn,
    SortDirection, SortState, User, UserDraft, UserFilter, UserListController, UserPatch,
    UsersError, login, validate_session,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

const TOKEN: &str = "test_token";

struct UsersTestContext {
    mock_server: MockServer,
    controller: UserListController,
}

impl UsersTestContext {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri());
        let controller = UserListController::new(config, AuthContext::with_token(TOKEN));
        Self {
            mock_server,
            controller,
        }
    }

    fn config(&self) -> BusinessConfig {
        BusinessConfig::new(self.mock_server.uri())
    }

    /// Mount `GET /usuarios/` returning `users`.
    async fn mock_list(&self, users: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/usuarios/"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "mensagem": "Usuários listados",
                "dados": users,
            })))
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    async fn load_sample(&mut self) {
        self.mock_list(sample_users()).await;
        self.controller.load_all().await.expect("sample list loads");
    }

    fn ids(&self) -> Vec<u64> {
        self.controller.users().iter().map(|u| u.id).collect()
    }
}

fn user_json(id: u64, nome: &str, login: &str, perfil: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "nome": nome,
        "login": login,
        "email": format!("{login}@uniways.test"),
        "perfil": perfil,
        "data_criacao": "2024-03-01T10:00:00",
        "status": "ativo",
    })
}

fn sample_users() -> serde_json::Value {
    serde_json::json!([
        user_json(1, "Beto", "beto", "admin"),
        user_json(2, "Ana", "ana", "usuario"),
        user_json(3, "Carla", "carla", "usuario"),
    ])
}

fn draft(nome: &str) -> UserDraft {
    UserDraft {
        nome: nome.to_owned(),
        login: "dani".to_owned(),
        senha: "s3nha".to_owned(),
        perfil: "usuario".to_owned(),
        email: None,
    }
}

// =========================================================================
// Loading
// =========================================================================

#[tokio::test]
async fn load_all_fills_cache_in_server_order() {
    let mut t = UsersTestContext::new().await;
    t.mock_list(sample_users()).await;

    let users = t.controller.load_all().await.expect("load succeeds");
    assert_eq!(users.len(), 3);
    assert_eq!(t.controller.state(), &ListState::Loaded);
    assert_eq!(t.ids(), vec![1, 2, 3]);
    assert_eq!(t.controller.users()[0].status.as_deref(), Some("ativo"));
}

#[tokio::test]
async fn first_load_failure_enters_load_failed() {
    let mut t = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/usuarios/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Banco indisponível",
        })))
        .mount(&t.mock_server)
        .await;

    let err = t.controller.load_all().await.expect_err("server error");
    assert_eq!(
        err,
        UsersError::Server {
            status: 500,
            message: "Banco indisponível".to_owned()
        }
    );
    assert!(matches!(t.controller.state(), ListState::LoadFailed(_)));
    assert!(t.controller.users().is_empty());

    let note = t.controller.take_notification().expect("error notification");
    assert_eq!(note.kind, NotificationKind::Error);
}

#[tokio::test]
async fn failed_reload_keeps_previous_cache() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("GET"))
        .and(path("/usuarios/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&t.mock_server)
        .await;

    assert!(t.controller.load_all().await.is_err());
    assert_eq!(t.controller.state(), &ListState::Loaded);
    assert_eq!(t.ids(), vec![1, 2, 3]);
}

#[tokio::test]
async fn non_json_response_is_malformed() {
    let mut t = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/usuarios/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>gateway</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&t.mock_server)
        .await;

    let err = t.controller.load_all().await.expect_err("html is rejected");
    assert!(matches!(err, UsersError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_list_dados_is_malformed() {
    let mut t = UsersTestContext::new().await;
    t.mock_list(serde_json::json!({ "id": 1 })).await;

    let err = t.controller.load_all().await.expect_err("object is not a list");
    assert!(matches!(err, UsersError::MalformedResponse(_)));
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let mut t = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/usuarios/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "detail": "Token expirado" })),
        )
        .mount(&t.mock_server)
        .await;

    let err = t.controller.load_all().await.expect_err("401");
    assert_eq!(err, UsersError::Unauthorized("Token expirado".to_owned()));
}

// =========================================================================
// View
// =========================================================================

#[tokio::test]
async fn view_sorts_and_filters_without_touching_cache() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    let sort = SortState::default().toggle(SortColumn::Nome);
    let names: Vec<String> = t
        .controller
        .view(&sort, &UserFilter::default())
        .into_iter()
        .map(|u| u.nome)
        .collect();
    assert_eq!(names, vec!["Ana", "Beto", "Carla"]);

    let sort = sort.toggle(SortColumn::Nome);
    assert_eq!(sort, SortState::by(SortColumn::Nome, SortDirection::Descending));

    let criteria = UserFilter {
        nome: Some("A".to_owned()),
        ..UserFilter::default()
    };
    let ids: Vec<u64> = t
        .controller
        .view(&sort, &criteria)
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![3, 2]);

    assert_eq!(t.ids(), vec![1, 2, 3]);
}

// =========================================================================
// Create
// =========================================================================

#[tokio::test]
async fn create_with_missing_name_sends_nothing() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("POST"))
        .and(path("/usuarios/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&t.mock_server)
        .await;

    let err = t.controller.create(&draft("")).await.expect_err("blank nome");
    assert_eq!(err, UsersError::MissingFields(vec!["nome"]));
    assert_eq!(t.ids(), vec![1, 2, 3]);

    let note = t.controller.take_notification().expect("warning");
    assert_eq!(note.kind, NotificationKind::Warning);
}

#[tokio::test]
async fn create_appends_server_record() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("POST"))
        .and(path("/usuarios/"))
        .and(header("Authorization", "Bearer test_token"))
        .and(body_json(serde_json::json!({
            "nome": "Dani",
            "login": "dani",
            "senha": "s3nha",
            "perfil": "usuario",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "status": "success",
            "mensagem": "Usuário criado com sucesso",
            "dados": user_json(4, "Dani", "dani", "usuario"),
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let created = t.controller.create(&draft(" Dani ")).await.expect("created");
    assert_eq!(created.id, 4);
    assert_eq!(t.ids(), vec![1, 2, 3, 4]);

    let note = t.controller.take_notification().expect("success");
    assert_eq!(note.kind, NotificationKind::Success);
    assert_eq!(note.message, "Usuário criado com sucesso");
}

#[tokio::test]
async fn create_field_errors_are_reported() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("POST"))
        .and(path("/usuarios/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Dados inválidos",
            "dados": [
                { "campo": "login", "mensagem": "Login já cadastrado", "tipo": "unique" }
            ],
        })))
        .mount(&t.mock_server)
        .await;

    let err = t.controller.create(&draft("Dani")).await.expect_err("422");
    assert_eq!(err.field_errors().len(), 1);
    assert_eq!(err.field_errors()[0].campo, "login");
    assert_eq!(t.ids(), vec![1, 2, 3]);

    let note = t.controller.take_notification().expect("error");
    assert!(note.message.contains("login: Login já cadastrado"));
}

// =========================================================================
// Update
// =========================================================================

#[tokio::test]
async fn update_replaces_only_the_target_record() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;
    let untouched: User = t.controller.users()[0].clone();

    Mock::given(method("PUT"))
        .and(path("/usuarios/2"))
        .and(header("Authorization", "Bearer test_token"))
        .and(body_json(serde_json::json!({ "perfil": "financeiro" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "mensagem": "Usuário atualizado",
            "dados": user_json(2, "Ana", "ana", "financeiro"),
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let patch = UserPatch {
        perfil: Some("financeiro".to_owned()),
        ..UserPatch::default()
    };
    let updated = t.controller.update(2, &patch).await.expect("updated");
    assert_eq!(updated.perfil, "financeiro");

    assert_eq!(t.ids(), vec![1, 2, 3]);
    assert_eq!(t.controller.find(2).map(|u| u.perfil.as_str()), Some("financeiro"));
    assert_eq!(t.controller.users()[0], untouched);
}

#[tokio::test]
async fn update_changed_sends_only_differences() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("PUT"))
        .and(path("/usuarios/3"))
        .and(body_json(serde_json::json!({ "nome": "Carla Dias" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "dados": user_json(3, "Carla Dias", "carla", "usuario"),
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let edited = UserPatch {
        nome: Some("Carla Dias".to_owned()),
        login: Some("carla".to_owned()),
        perfil: Some("usuario".to_owned()),
        ..UserPatch::default()
    };
    t.controller.update_changed(3, edited).await.expect("updated");
    assert_eq!(t.controller.find(3).map(|u| u.nome.as_str()), Some("Carla Dias"));
}

#[tokio::test]
async fn update_failure_leaves_cache() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;
    let before = t.controller.users().to_vec();

    Mock::given(method("PUT"))
        .and(path("/usuarios/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&t.mock_server)
        .await;

    let patch = UserPatch {
        nome: Some("Ana Maria".to_owned()),
        ..UserPatch::default()
    };
    assert!(t.controller.update(2, &patch).await.is_err());
    assert_eq!(t.controller.users(), before.as_slice());
}

#[tokio::test]
async fn update_error_envelope_with_ok_status_leaves_cache() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;
    let before = t.controller.users().to_vec();

    Mock::given(method("PUT"))
        .and(path("/usuarios/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Dados inválidos",
            "dados": [
                { "campo": "login", "mensagem": "Login já cadastrado" }
            ],
        })))
        .mount(&t.mock_server)
        .await;

    let patch = UserPatch {
        login: Some("beto".to_owned()),
        ..UserPatch::default()
    };
    let err = t.controller.update(2, &patch).await.expect_err("error envelope");
    assert_eq!(err.field_errors().len(), 1);
    assert_eq!(err.field_errors()[0].campo, "login");
    assert_eq!(t.controller.users(), before.as_slice());

    let note = t.controller.take_notification().expect("error");
    assert_eq!(note.kind, NotificationKind::Error);
}

// =========================================================================
// Remove
// =========================================================================

#[tokio::test]
async fn remove_drops_record() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("DELETE"))
        .and(path("/usuarios/1"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "mensagem": "Usuário excluído",
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    t.controller.remove(1).await.expect("deleted");
    assert_eq!(t.ids(), vec![2, 3]);
}

#[tokio::test]
async fn remove_unknown_id_is_not_found() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("DELETE"))
        .and(path("/usuarios/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Usuário não encontrado",
        })))
        .mount(&t.mock_server)
        .await;

    let err = t.controller.remove(99).await.expect_err("404");
    assert_eq!(err, UsersError::NotFound(99));
    assert_eq!(t.ids(), vec![1, 2, 3]);
}

#[tokio::test]
async fn remove_accepts_empty_body() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("DELETE"))
        .and(path("/usuarios/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&t.mock_server)
        .await;

    t.controller.remove(3).await.expect("deleted");
    assert_eq!(t.ids(), vec![1, 2]);
}

#[tokio::test]
async fn remove_error_envelope_with_ok_status_keeps_record() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("DELETE"))
        .and(path("/usuarios/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Não permitido",
        })))
        .mount(&t.mock_server)
        .await;

    let err = t.controller.remove(2).await.expect_err("error envelope");
    assert_eq!(
        err,
        UsersError::Server {
            status: 200,
            message: "Não permitido".to_owned()
        }
    );
    assert_eq!(t.ids(), vec![1, 2, 3]);

    let note = t.controller.take_notification().expect("error");
    assert_eq!(note.kind, NotificationKind::Error);
}

#[tokio::test]
async fn remove_uncached_id_confirmed_by_server_is_a_no_op() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;

    Mock::given(method("DELETE"))
        .and(path("/usuarios/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "mensagem": "Usuário excluído",
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    t.controller.remove(99).await.expect("server confirmed");
    assert_eq!(t.ids(), vec![1, 2, 3]);
    assert_eq!(t.controller.state(), &ListState::Loaded);
}

#[tokio::test]
async fn remove_server_failure_leaves_cache() {
    let mut t = UsersTestContext::new().await;
    t.load_sample().await;
    let before = t.controller.users().to_vec();

    Mock::given(method("DELETE"))
        .and(path("/usuarios/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "mensagem": "Falha interna",
        })))
        .mount(&t.mock_server)
        .await;

    let err = t.controller.remove(1).await.expect_err("500");
    assert_eq!(
        err,
        UsersError::Server {
            status: 500,
            message: "Falha interna".to_owned()
        }
    );
    assert_eq!(t.controller.users(), before.as_slice());
}

// =========================================================================
// Session
// =========================================================================

#[tokio::test]
async fn login_returns_bearer_context() {
    let t = UsersTestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/usuarios/login"))
        .and(body_json(serde_json::json!({ "login": "admin", "senha": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "mensagem": "Login realizado",
            "dados": { "access_token": "fresh", "token_type": "bearer" },
        })))
        .expect(1)
        .mount(&t.mock_server)
        .await;

    let ctx = login(&t.config(), "admin", "pw").await.expect("login");
    assert_eq!(ctx.token(), Some("fresh"));
}

#[tokio::test]
async fn login_rejection_is_invalid_credentials() {
    let t = UsersTestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/usuarios/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Login ou senha inválidos",
        })))
        .mount(&t.mock_server)
        .await;

    let err = login(&t.config(), "admin", "wrong").await.expect_err("401");
    assert_eq!(
        err,
        UsersError::InvalidCredentials("Login ou senha inválidos".to_owned())
    );
}

#[tokio::test]
async fn validate_session_accepts_live_token() {
    let t = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/usuarios/me"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "usuario": { "sub": "admin", "exp": 1_900_000_000 },
        })))
        .mount(&t.mock_server)
        .await;

    let check = validate_session(&t.config(), AuthContext::with_token(TOKEN)).await;
    assert!(check.is_valid());
    assert_eq!(check.into_context().token(), Some(TOKEN));
}

#[tokio::test]
async fn validate_session_drops_rejected_token() {
    let t = UsersTestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/usuarios/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&t.mock_server)
        .await;

    let check = validate_session(&t.config(), AuthContext::with_token(TOKEN)).await;
    assert!(matches!(check, SessionCheck::Expired { .. }));
    assert!(!check.into_context().is_authenticated());
}
