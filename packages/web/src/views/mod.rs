mod auth_layout;
pub use auth_layout::AuthLayout;

mod main_layout;
pub use main_layout::MainLayout;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod forgot_password;
pub use forgot_password::ForgotPassword;

mod dashboard;
pub use dashboard::Dashboard;

mod profile;
pub use profile::Profile;

mod face_registration;
pub use face_registration::FaceRegistration;

mod absence;
pub use absence::Absence;
