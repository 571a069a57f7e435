use std::sync::Arc;

use dao_impl_sqlite::attendance::AttendanceDaoImpl;
use dao_impl_sqlite::branch::BranchDaoImpl;
use dao_impl_sqlite::employee::EmployeeDaoImpl;
use dao_impl_sqlite::PermissionDaoImpl;
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

#[cfg(feature = "mock_auth")]
type UserService = service_impl::UserServiceDev;

type PermissionService = service_impl::PermissionServiceImpl<PermissionDaoImpl, UserService>;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type CalendarService = service_impl::calendar::CalendarServiceImpl;
type PeriodService = service_impl::period::PeriodServiceImpl;
type BranchService =
    service_impl::branch::BranchServiceImpl<BranchDaoImpl, PermissionService, ClockService, UuidService>;
type EmployeeService = service_impl::employee::EmployeeServiceImpl<
    EmployeeDaoImpl,
    PermissionService,
    ClockService,
    UuidService,
>;
type AttendanceService = service_impl::attendance::AttendanceServiceImpl<
    AttendanceDaoImpl,
    EmployeeService,
    BranchService,
    ClockService,
    UuidService,
>;
type StatisticsService = service_impl::statistics::StatisticsServiceImpl<
    AttendanceService,
    EmployeeService,
    BranchService,
    CalendarService,
    PeriodService,
    ClockService,
>;
type TimesheetService = service_impl::timesheet::TimesheetServiceImpl<
    AttendanceService,
    EmployeeService,
    BranchService,
    CalendarService,
    ClockService,
>;

#[derive(Clone)]
pub struct RestStateImpl {
    branch_service: Arc<BranchService>,
    employee_service: Arc<EmployeeService>,
    attendance_service: Arc<AttendanceService>,
    statistics_service: Arc<StatisticsService>,
    timesheet_service: Arc<TimesheetService>,
}

impl rest::RestStateDef for RestStateImpl {
    type BranchService = BranchService;
    type EmployeeService = EmployeeService;
    type AttendanceService = AttendanceService;
    type StatisticsService = StatisticsService;
    type TimesheetService = TimesheetService;

    fn branch_service(&self) -> Arc<Self::BranchService> {
        self.branch_service.clone()
    }
    fn employee_service(&self) -> Arc<Self::EmployeeService> {
        self.employee_service.clone()
    }
    fn attendance_service(&self) -> Arc<Self::AttendanceService> {
        self.attendance_service.clone()
    }
    fn statistics_service(&self) -> Arc<Self::StatisticsService> {
        self.statistics_service.clone()
    }
    fn timesheet_service(&self) -> Arc<Self::TimesheetService> {
        self.timesheet_service.clone()
    }
}

impl RestStateImpl {
    pub fn new(pool: Arc<sqlx::Pool<sqlx::Sqlite>>) -> Self {
        let permission_dao = PermissionDaoImpl::new(pool.clone());
        let branch_dao = BranchDaoImpl::new(pool.clone());
        let employee_dao = EmployeeDaoImpl::new(pool.clone());
        let attendance_dao = AttendanceDaoImpl::new(pool.clone());

        // Always authenticate with DEVUSER during development. A proper
        // login service replaces this behind the mock_auth feature.
        #[cfg(feature = "mock_auth")]
        let user_service = service_impl::UserServiceDev;
        let user_service = Arc::new(user_service);

        let permission_service = Arc::new(service_impl::PermissionServiceImpl::new(
            permission_dao.into(),
            user_service,
        ));
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);
        let calendar_service = Arc::new(service_impl::calendar::CalendarServiceImpl);
        let period_service = Arc::new(service_impl::period::PeriodServiceImpl);

        let branch_service = Arc::new(service_impl::branch::BranchServiceImpl::new(
            branch_dao.into(),
            permission_service.clone(),
            clock_service.clone(),
            uuid_service.clone(),
        ));
        let employee_service = Arc::new(service_impl::employee::EmployeeServiceImpl::new(
            employee_dao.into(),
            permission_service.clone(),
            clock_service.clone(),
            uuid_service.clone(),
        ));
        let attendance_service = Arc::new(service_impl::attendance::AttendanceServiceImpl::new(
            attendance_dao.into(),
            employee_service.clone(),
            branch_service.clone(),
            clock_service.clone(),
            uuid_service.clone(),
        ));
        let statistics_service = Arc::new(service_impl::statistics::StatisticsServiceImpl::new(
            attendance_service.clone(),
            employee_service.clone(),
            branch_service.clone(),
            calendar_service.clone(),
            period_service.clone(),
            clock_service.clone(),
        ));
        let timesheet_service = Arc::new(service_impl::timesheet::TimesheetServiceImpl::new(
            attendance_service.clone(),
            employee_service.clone(),
            branch_service.clone(),
            calendar_service.clone(),
            clock_service.clone(),
        ));

        Self {
            branch_service,
            employee_service,
            attendance_service,
            statistics_service,
            timesheet_service,
        }
    }
}

async fn create_admin_user(pool: Arc<SqlitePool>, username: &str) {
    use dao::PermissionDao;
    let permission_dao = PermissionDaoImpl::new(pool);

    let existing = permission_dao
        .find_user(username)
        .await
        .expect("Expected to query users");
    if existing.is_none() {
        permission_dao
            .create_user(
                &dao::UserEntity {
                    name: username.into(),
                },
                "first-start",
            )
            .await
            .unwrap_or_else(|_| panic!("Expected being able to create the {} user", username));
        permission_dao
            .add_user_role(username, "admin", "first-start")
            .await
            .unwrap_or_else(|_| panic!("Expected being able to make {} an admin", username));
    }
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("Tabel backend version: {}", version);
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./tabel.sqlite3?mode=rwc".to_string());
    let pool = Arc::new(
        SqlitePool::connect(&database_url)
            .await
            .expect("Could not connect to database"),
    );

    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    let rest_state = RestStateImpl::new(pool.clone());
    create_admin_user(pool.clone(), "DEVUSER").await;
    create_admin_user(pool.clone(), "admin").await;

    rest::start_server(rest_state).await
}
