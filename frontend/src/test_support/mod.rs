pub mod ssr;

pub mod helpers {
    use crate::api::types::{UserInfo, UserResponse};
    use crate::session::Session;

    pub fn regular_user() -> UserInfo {
        UserInfo {
            profile: UserResponse {
                id: 7,
                username: "member".into(),
                email: Some("member@example.com".into()),
                full_name: Some("Regular Member".into()),
                department: Some("Engineering".into()),
                position: Some("Developer".into()),
                employee_id: Some("E-7".into()),
                hire_date: Some("2020-06-01".into()),
                is_active: true,
                is_admin: false,
            },
            annual_leave: None,
        }
    }

    pub fn admin_user() -> UserInfo {
        let mut user = regular_user();
        user.profile.id = 1;
        user.profile.username = "admin".into();
        user.profile.full_name = Some("Admin User".into());
        user.profile.is_admin = true;
        user
    }

    pub fn authenticated_session(user: Option<UserInfo>) -> Session {
        let session = Session::in_memory();
        session.set_token("test-token");
        if let Some(user) = user {
            session.set_user(&user);
        }
        session
    }
}
