//! Entry point tying the locator, inspector, resolver, and cache together.

use std::path::Path;
use std::sync::Arc;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::ports::command::CommandRunner;
use crate::ports::filesystem::FileSystem;
use crate::version::cache::{ResolutionCache, ResolutionKey};
use crate::version::details::VersionDetails;
use crate::version::inspector::GitInspector;
use crate::version::locator::{RepositoryLocator, RepositoryRoot};
use crate::version::prefix::TagPrefix;
use crate::version::resolver::VersionResolver;
use crate::version::timer::{Timer, RESOLVE};

/// Resolves versions for directories, sharing results through a cache.
///
/// Several services may share one [`ResolutionCache`]; the cache, not the
/// service, decides whether git is consulted again.
pub struct VersionService {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    cache: Arc<ResolutionCache>,
    testing: bool,
}

impl VersionService {
    /// Creates a service from explicit adapters and a shared cache.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FileSystem>,
        cache: Arc<ResolutionCache>,
    ) -> Self {
        Self {
            runner,
            fs,
            cache,
            testing: false,
        }
    }

    /// Creates a service using the adapters of `ctx`.
    #[must_use]
    pub fn from_context(ctx: &ServiceContext, cache: Arc<ResolutionCache>) -> Self {
        Self::new(Arc::clone(&ctx.runner), Arc::clone(&ctx.fs), cache)
    }

    /// Builds inspectors with [`GitInspector::for_testing`], which configures
    /// a placeholder identity in repositories that lack one.
    #[must_use]
    pub fn testing(mut self) -> Self {
        self.testing = true;
        self
    }

    /// Finds the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::VersionError::RepositoryNotFound`] when no
    /// ancestor of `dir` contains `.git`.
    pub fn repository_root(&self, dir: &Path) -> Result<RepositoryRoot> {
        RepositoryLocator::new(self.fs.as_ref()).locate(dir)
    }

    /// Version details for the repository containing `dir`, resolved at most
    /// once per repository and prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be found or git cannot be run.
    pub fn version_details(&self, dir: &Path, prefix: &TagPrefix) -> Result<Arc<VersionDetails>> {
        let key = ResolutionKey::new(self.repository_root(dir)?, prefix.clone());
        self.cache.get_or_resolve(&key, |timer| {
            let resolver = self.resolver(&key.root, key.prefix.clone())?;
            Ok(resolver.resolve(timer))
        })
    }

    /// The version string for the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// See [`VersionService::version_details`].
    pub fn git_version(&self, dir: &Path, prefix: &TagPrefix) -> Result<String> {
        Ok(self.version_details(dir, prefix)?.version.clone())
    }

    /// Resolves `dir` with the default prefix, bypassing the cache.
    ///
    /// Each call runs git again and times itself with a private timer.
    ///
    /// # Errors
    ///
    /// See [`VersionService::version_details`].
    pub fn resolve_uncached(&self, dir: &Path) -> Result<VersionDetails> {
        let root = self.repository_root(dir)?;
        let timer = Timer::new();
        let resolver = self.resolver(&root, TagPrefix::default())?;
        Ok(timer.record(RESOLVE, || resolver.resolve(&timer)))
    }

    /// Timings accumulated by the shared cache.
    #[must_use]
    pub fn timer(&self) -> &Timer {
        self.cache.timer()
    }

    fn resolver(&self, root: &RepositoryRoot, prefix: TagPrefix) -> Result<VersionResolver> {
        let runner = Arc::clone(&self.runner);
        let inspector = if self.testing {
            GitInspector::for_testing(runner, root)?
        } else {
            GitInspector::new(runner, root)?
        };
        Ok(VersionResolver::new(inspector, prefix))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::error::VersionError;
    use crate::testing::{ScriptedRunner, DESCRIBE_ALL};

    const HASH: &str = "abc1234def5678abc1234def5678abc1234def56";

    struct Repos(HashSet<PathBuf>);

    impl FileSystem for Repos {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn service(runner: &Arc<ScriptedRunner>) -> VersionService {
        let fs = Repos(HashSet::from([PathBuf::from("/work/app/.git")]));
        let cache = Arc::new(ResolutionCache::new());
        VersionService::new(runner.clone(), Arc::new(fs), cache)
    }

    fn details(service: &VersionService, dir: &str) -> Result<Arc<VersionDetails>> {
        service.version_details(Path::new(dir), &TagPrefix::default())
    }

    fn version(service: &VersionService, dir: &str, prefix: &TagPrefix) -> String {
        service.git_version(Path::new(dir), prefix).unwrap()
    }

    #[test]
    fn resolves_from_nested_directory() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH));
        let service = service(&runner);

        let resolved = details(&service, "/work/app/modules/core").unwrap();
        assert_eq!(resolved.version, "v1.0.0");
        assert!(resolved.is_clean_tag);
        for invocation in runner.invocations() {
            assert_eq!(invocation.cwd, Path::new("/work/app"));
        }
    }

    #[test]
    fn modules_of_one_repository_share_a_resolution() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-1-gabc1234", HASH));
        let service = service(&runner);

        let a = details(&service, "/work/app/a").unwrap();
        let b = details(&service, "/work/app/b").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(runner.calls_to(DESCRIBE_ALL), 1);
        let all = TagPrefix::default();
        assert_eq!(version(&service, "/work/app", &all), "v1.0.0.1.gabc1234");
    }

    #[test]
    fn dotted_spellings_of_a_directory_share_a_resolution() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH));
        let service = service(&runner);

        let dotted = details(&service, "/work/app/sub/..").unwrap();
        let plain = details(&service, "/work/app").unwrap();
        assert!(Arc::ptr_eq(&dotted, &plain));
        assert_eq!(runner.calls_to(DESCRIBE_ALL), 1);
    }

    #[test]
    fn concurrent_queries_run_git_once() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH));
        let service = Arc::new(service(&runner));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    details(&service, "/work/app").unwrap()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(Arc::ptr_eq(&results[0], &results[1]));
        assert_eq!(runner.calls_to(DESCRIBE_ALL), 1);
        assert_eq!(runner.calls_to("version"), 1);
    }

    #[test]
    fn strict_prefix_falls_back_to_bare_hash() {
        let runner = ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH).ok(
            "describe --tags --always --first-parent --long --abbrev=7 --match=rel-* HEAD",
            "abc1234",
        );
        let runner = Arc::new(runner);
        let service = service(&runner);

        let rel = TagPrefix::new("rel-").unwrap();
        let all = TagPrefix::default();
        assert_eq!(version(&service, "/work/app", &rel), "abc1234");
        assert_eq!(version(&service, "/work/app", &all), "v1.0.0");
    }

    #[test]
    fn missing_repository_is_fatal() {
        let runner = Arc::new(ScriptedRunner::new());
        let err = details(&service(&runner), "/elsewhere").unwrap_err();
        assert!(matches!(err, VersionError::RepositoryNotFound(_)));
        assert_eq!(runner.total_calls(), 0);
    }

    #[test]
    fn missing_git_is_fatal_and_not_cached() {
        let runner = Arc::new(ScriptedRunner::unspawnable());
        let service = service(&runner);
        for _ in 0..2 {
            let err = details(&service, "/work/app").unwrap_err();
            assert!(matches!(err, VersionError::GitUnavailable(_)));
        }
        assert_eq!(runner.calls_to("version"), 2);
    }

    #[test]
    fn uncached_resolution_runs_git_every_time() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH));
        let service = service(&runner);

        let first = service.resolve_uncached(Path::new("/work/app")).unwrap();
        let second = service.resolve_uncached(Path::new("/work/app")).unwrap();
        assert_eq!(first, second);
        assert_eq!(runner.calls_to(DESCRIBE_ALL), 2);
        assert!(service.timer().snapshot().is_empty());
    }

    #[test]
    fn testing_service_ensures_identity() {
        let runner = Arc::new(ScriptedRunner::repository("v1.0.0-0-gabc1234", HASH));
        let service = service(&runner).testing();
        details(&service, "/work/app").unwrap();
        assert_eq!(runner.calls_to("config user.email"), 1);
    }
}
