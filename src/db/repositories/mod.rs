pub mod cart_repository;
pub mod catalog_repository;
pub mod certificate_repository;
pub mod enrollment_repository;
pub mod review_repository;
pub mod user_repository;

pub use cart_repository::CartRepository;
pub use catalog_repository::CatalogRepository;
pub use certificate_repository::CertificateRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use review_repository::ReviewRepository;
pub use user_repository::UserRepository;
