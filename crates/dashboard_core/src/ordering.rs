use std::cmp::Ordering;

use crate::{Job, Project};

/// Locale-style text comparison: case-folded first, then lowercase before
/// uppercase, then raw order so distinct strings never compare equal.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| lowercase_first(a, b))
        .then_with(|| a.cmp(b))
}

fn lowercase_first(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    Ordering::Equal
}

pub fn compare_jobs(a: &Job, b: &Job) -> Ordering {
    locale_compare(&a.name, &b.name).then_with(|| locale_compare(&a.namespace, &b.namespace))
}

pub fn compare_projects(a: &Project, b: &Project) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| locale_compare(&a.name, &b.name))
}

pub fn sort_jobs(jobs: &mut [Job]) {
    jobs.sort_by(compare_jobs);
}

pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(compare_projects);
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{locale_compare, sort_projects};
    use crate::{Project, ProjectStatus};

    #[test]
    fn locale_compare_ignores_case_before_tiebreak() {
        assert_eq!(locale_compare("alpha", "Beta"), Ordering::Less);
        assert_eq!(locale_compare("Beta", "alpha"), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }

    #[test]
    fn projects_sort_by_bucket_then_name() {
        let mut projects = vec![
            Project::new("zeta", ProjectStatus::Completed),
            Project::new("mystery", ProjectStatus::parse("paused")),
            Project::new("beta", ProjectStatus::Running),
            Project::new("alpha", ProjectStatus::Running),
            Project::new("gamma", ProjectStatus::Failed),
            Project::new("delta", ProjectStatus::Scheduled),
            Project::new("blank", ProjectStatus::parse("")),
        ];
        sort_projects(&mut projects);

        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["alpha", "beta", "delta", "gamma", "zeta", "blank", "mystery"]
        );
    }
}
