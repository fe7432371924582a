/*!
The route surface and which parts of it each role may visit.
*/
use crate::user::Role;

/// Every destination the application knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// The public login page.
    Root,
    Dashboard,
    Admissions,
    Academics,
    Attendance,
    Homework,
    Finance,
    Users,
    Announcements,
    Reports,
    Settings,
    /// Anything that isn't one of the above.
    NotFound,
}

impl Route {
    /// The functional areas, in menu order.
    pub const AREAS: [Route; 10] = [
        Route::Dashboard,
        Route::Admissions,
        Route::Academics,
        Route::Attendance,
        Route::Homework,
        Route::Finance,
        Route::Users,
        Route::Announcements,
        Route::Reports,
        Route::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root          => "/",
            Route::Dashboard     => "/dashboard",
            Route::Admissions    => "/admissions",
            Route::Academics     => "/academics",
            Route::Attendance    => "/attendance",
            Route::Homework      => "/homework",
            Route::Finance       => "/finance",
            Route::Users         => "/users",
            Route::Announcements => "/announcements",
            Route::Reports       => "/reports",
            Route::Settings      => "/settings",
            Route::NotFound      => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Root          => "Login",
            Route::Dashboard     => "Dashboard",
            Route::Admissions    => "Admissions",
            Route::Academics     => "Academics",
            Route::Attendance    => "Attendance",
            Route::Homework      => "Homework",
            Route::Finance       => "Finance",
            Route::Users         => "Users",
            Route::Announcements => "Announcements",
            Route::Reports       => "Reports",
            Route::Settings      => "Settings",
            Route::NotFound      => "Page Not Found",
        }
    }

    /**
    Map a request path onto a `Route`.

    A single trailing slash is ignored, so `/finance/` is `Route::Finance`.
    Nothing else is normalized; unrecognized paths are `Route::NotFound`.
    */
    pub fn from_path(path: &str) -> Route {
        if path == "/" {
            return Route::Root;
        }
        let path = path.strip_suffix('/').unwrap_or(path);

        for r in Route::AREAS.iter() {
            if r.path() == path {
                return *r;
            }
        }
        Route::NotFound
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Home,
    UserPlus,
    BookOpen,
    Calendar,
    GraduationCap,
    DollarSign,
    Calculator,
    Users,
    MessageSquare,
    FileText,
    Settings,
}

impl Icon {
    /// Name of the icon in the stylesheet's icon set.
    pub fn name(&self) -> &'static str {
        match self {
            Icon::Home          => "home",
            Icon::UserPlus      => "user-plus",
            Icon::BookOpen      => "book-open",
            Icon::Calendar      => "calendar",
            Icon::GraduationCap => "graduation-cap",
            Icon::DollarSign    => "dollar-sign",
            Icon::Calculator    => "calculator",
            Icon::Users         => "users",
            Icon::MessageSquare => "message-square",
            Icon::FileText      => "file-text",
            Icon::Settings      => "settings",
        }
    }
}

/// One entry in a role's navigation menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub icon: Icon,
}

impl NavItem {
    const fn new(route: Route, label: &'static str, icon: Icon) -> Self {
        Self { route, label, icon }
    }

    pub fn path(&self) -> &'static str { self.route.path() }
}

const DASHBOARD: NavItem = NavItem::new(Route::Dashboard, "Dashboard", Icon::Home);
const ANNOUNCEMENTS: NavItem = NavItem::new(
    Route::Announcements, "Announcements", Icon::MessageSquare
);
const HOMEWORK: NavItem = NavItem::new(Route::Homework, "Homework", Icon::GraduationCap);
const ATTENDANCE: NavItem = NavItem::new(Route::Attendance, "Attendance", Icon::Calendar);

static DASHBOARD_ONLY: &[NavItem] = &[DASHBOARD];

static ADMIN_NAV: &[NavItem] = &[
    DASHBOARD,
    NavItem::new(Route::Admissions, "Admissions", Icon::UserPlus),
    NavItem::new(Route::Academics, "Academics", Icon::BookOpen),
    ATTENDANCE,
    HOMEWORK,
    NavItem::new(Route::Finance, "Finance", Icon::DollarSign),
    NavItem::new(Route::Users, "Users", Icon::Users),
    ANNOUNCEMENTS,
    NavItem::new(Route::Reports, "Reports", Icon::FileText),
    NavItem::new(Route::Settings, "Settings", Icon::Settings),
];

static TEACHER_NAV: &[NavItem] = &[
    DASHBOARD,
    NavItem::new(Route::Academics, "My Classes", Icon::BookOpen),
    ATTENDANCE,
    HOMEWORK,
    ANNOUNCEMENTS,
];

static STUDENT_NAV: &[NavItem] = &[
    DASHBOARD,
    NavItem::new(Route::Academics, "My Subjects", Icon::BookOpen),
    HOMEWORK,
    ANNOUNCEMENTS,
];

static PARENT_NAV: &[NavItem] = &[
    DASHBOARD,
    NavItem::new(Route::Academics, "Child's Progress", Icon::BookOpen),
    NavItem::new(Route::Finance, "Fee Status", Icon::DollarSign),
    ANNOUNCEMENTS,
];

static ACCOUNTANT_NAV: &[NavItem] = &[
    DASHBOARD,
    NavItem::new(Route::Finance, "Finance", Icon::Calculator),
    NavItem::new(Route::Reports, "Financial Reports", Icon::FileText),
    ANNOUNCEMENTS,
];

/// The menu for `role`, dashboard first.
pub fn navigation_for(role: Role) -> &'static [NavItem] {
    match role {
        Role::Admin      => ADMIN_NAV,
        Role::Teacher    => TEACHER_NAV,
        Role::Student    => STUDENT_NAV,
        Role::Parent     => PARENT_NAV,
        Role::Accountant => ACCOUNTANT_NAV,
    }
}

/// Like `navigation_for()`, but from a role token; tokens that don't name
/// a role get the dashboard alone.
pub fn navigation_for_token(token: &str) -> &'static [NavItem] {
    match token.parse::<Role>() {
        Ok(role) => navigation_for(role),
        Err(_) => DASHBOARD_ONLY,
    }
}

/// Whether `role` may visit `route`. The dashboard is always allowed.
pub fn permits(role: Role, route: Route) -> bool {
    route == Route::Dashboard
        || navigation_for(role).iter().any(|item| item.route == route)
}
