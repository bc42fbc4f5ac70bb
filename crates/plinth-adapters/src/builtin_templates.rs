//! Built-in templates.
//!
//! Templates that ship with Plinth. [`all_templates`] returns a fresh,
//! un-frozen instance of each in registration order, ready to hand to
//! `ScaffoldService::scaffold`.
//!
//! | name        | default path                   | slots                               |
//! |-------------|--------------------------------|-------------------------------------|
//! | `e2e-test`  | `test/e2e/e2e_test.go`         | Boilerplate, Repository, ProjectName |
//! | `e2e-suite` | `test/e2e/e2e_suite_test.go`   | Boilerplate, Repository, ProjectName |

use plinth_core::domain::{DomainResult, MixinSlot, Template, TemplateBase};

// ── Public API ────────────────────────────────────────────────────────────────

/// Every built-in template, in registration order.
///
/// # Errors
///
/// Only if a built-in declares the same slot twice, which is a bug.
pub fn all_templates() -> DomainResult<Vec<Box<dyn Template>>> {
    Ok(vec![Box::new(E2eTest::new()?), Box::new(E2eSuite::new()?)])
}

/// Names of the built-ins, in registration order.
pub fn names() -> &'static [&'static str] {
    &[E2eTest::NAME, E2eSuite::NAME]
}

const STANDARD_SLOTS: [MixinSlot; 3] = [
    MixinSlot::Boilerplate,
    MixinSlot::Repository,
    MixinSlot::ProjectName,
];

// ── e2e-test ─────────────────────────────────────────────────────────────────

/// Ginkgo end-to-end test that deploys the controller manager into a kind
/// cluster and probes its readiness endpoint.
#[derive(Debug, Clone)]
pub struct E2eTest {
    base: TemplateBase,
}

impl E2eTest {
    pub const NAME: &'static str = "e2e-test";
    pub const DEFAULT_PATH: &'static str = "test/e2e/e2e_test.go";

    pub fn new() -> DomainResult<Self> {
        Ok(Self {
            base: TemplateBase::new(STANDARD_SLOTS)?,
        })
    }
}

impl Template for E2eTest {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn set_defaults(&mut self) -> DomainResult<()> {
        self.base.default_path(Self::DEFAULT_PATH);
        self.base.default_body(E2E_TEST_BODY);
        Ok(())
    }
}

// ── e2e-suite ────────────────────────────────────────────────────────────────

/// Ginkgo suite entry point for the e2e package.
#[derive(Debug, Clone)]
pub struct E2eSuite {
    base: TemplateBase,
}

impl E2eSuite {
    pub const NAME: &'static str = "e2e-suite";
    pub const DEFAULT_PATH: &'static str = "test/e2e/e2e_suite_test.go";

    pub fn new() -> DomainResult<Self> {
        Ok(Self {
            base: TemplateBase::new(STANDARD_SLOTS)?,
        })
    }
}

impl Template for E2eSuite {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn base(&self) -> &TemplateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TemplateBase {
        &mut self.base
    }

    fn set_defaults(&mut self) -> DomainResult<()> {
        self.base.default_path(Self::DEFAULT_PATH);
        self.base.default_body(E2E_SUITE_BODY);
        Ok(())
    }
}

// ── Bodies ───────────────────────────────────────────────────────────────────

const E2E_TEST_BODY: &str = r#"{{ .Boilerplate }}


package e2e

import (
	"context"
	"fmt"
	"net/http"
	"os/exec"
	"sigs.k8s.io/controller-runtime/pkg/client/config"
	"strconv"
	"time"

	"github.com/go-resty/resty/v2"
	. "github.com/onsi/ginkgo/v2"
	. "github.com/onsi/gomega"
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"

	"{{ .Repo }}/test/utils"
)

const namespace = "{{ .ProjectName }}-system"
const deploymentName = "{{ .ProjectName }}-controller-manager"

var _ = Describe("controller", Ordered, func() {
	BeforeAll(func() {
		var err error
		By("create kind environment", func() {
			cmd := exec.Command("make", "kind-create")
			_, err = utils.Run(cmd)
			ExpectWithOffset(1, err).NotTo(HaveOccurred())
		})

		By("upload latest image to kind cluster", func() {
			cmd := exec.Command("make", "kind-load")
			_, err = utils.Run(cmd)
			ExpectWithOffset(1, err).NotTo(HaveOccurred())
		})

		By("prepare k8s", func() {
			cmd := exec.Command("make", "k8s-prepare")
			_, err = utils.Run(cmd)
			ExpectWithOffset(1, err).NotTo(HaveOccurred())
		})

		By("deploy controller-manager", func() {
			cmd := exec.Command("make", "deploy")
			_, err = utils.Run(cmd)
			ExpectWithOffset(1, err).NotTo(HaveOccurred())
		})

	})

	AfterAll(func() {
		var err error
		By("cleanup", func() {
			cmd := exec.Command("make", "undeploy")
			_, err = utils.Run(cmd)
			ExpectWithOffset(1, err).NotTo(HaveOccurred())
		})
	})

	Context("Operator", func() {
		It("should run successfully", func() {
			kubeconfig := config.GetConfigOrDie()
			clientset, err := utils.GetClientset(kubeconfig)

			deployment, err := clientset.AppsV1().Deployments(namespace).Get(context.TODO(), deploymentName, metav1.GetOptions{})
			if err != nil {
				panic(err.Error())
			}

			selector := deployment.Spec.Selector.MatchLabels
			labelSelector := metav1.LabelSelector{MatchLabels: selector}

			pods, err := clientset.CoreV1().Pods(namespace).List(context.TODO(), metav1.ListOptions{
				LabelSelector: metav1.FormatLabelSelector(&labelSelector),
			})

			if err != nil {
				panic(err.Error())
			}

			stopCh := make(chan struct{}, 1)
			readyCh := make(chan struct{})
			localPort, err := utils.GetFreePort()
			localPortStr := strconv.Itoa(localPort)

			err = utils.RunPortForward(kubeconfig, namespace, pods.Items[0].Name, []string{fmt.Sprintf("%s:8081", localPortStr)}, stopCh, readyCh)
			if err != nil {
				panic(err.Error())
			}
			<-readyCh

			readyzURL := fmt.Sprintf("http://localhost:%s/readyz", localPortStr)
			client := resty.New().SetTimeout(5 * time.Second)
			resp, err := client.R().Get(readyzURL)
			if err != nil {
				panic(err.Error())
			}

			Expect(resp.StatusCode()).To(Equal(http.StatusOK))
			Expect(resp.Body()).To(Equal([]uint8{'o', 'k'}))

			close(stopCh)
			<-stopCh
		})
	})
})
"#;

const E2E_SUITE_BODY: &str = r#"{{ .Boilerplate }}


package e2e

import (
	"fmt"
	"testing"

	. "github.com/onsi/ginkgo/v2"
	. "github.com/onsi/gomega"
)

// Run e2e tests using the Ginkgo runner.
func TestE2E(t *testing.T) {
	RegisterFailHandler(Fail)
	_, _ = fmt.Fprintf(GinkgoWriter, "Starting {{ .ProjectName }} suite\n")
	RunSpecs(t, "e2e suite")
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::domain::ConfigurationContext;

    fn context() -> ConfigurationContext {
        ConfigurationContext::builder()
            .project_name("memcached-operator")
            .repository("github.com/example/memcached-operator")
            .boilerplate("/*\nCopyright 2024.\n*/")
            .build()
            .unwrap()
    }

    #[test]
    fn registration_order_is_stable() {
        let names: Vec<String> = all_templates()
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["e2e-test", "e2e-suite"]);
        assert_eq!(names, super::names());
    }

    #[test]
    fn e2e_test_defaults_only_fill_empty_fields() {
        let mut t = E2eTest::new().unwrap();
        t.base_mut()
            .override_path("e2e-test", "test/e2e/custom_test.go")
            .unwrap();
        t.base_mut().mixins_mut().inject(&context());
        t.set_defaults().unwrap();

        assert_eq!(t.base().path(), "test/e2e/custom_test.go");
        assert!(t.base().body().contains("{{ .Repo }}/test/utils"));
    }

    #[test]
    fn e2e_suite_defaults_path() {
        let mut t = E2eSuite::new().unwrap();
        t.set_defaults().unwrap();
        assert_eq!(t.base().path(), "test/e2e/e2e_suite_test.go");
        assert!(t.base().body().starts_with("{{ .Boilerplate }}"));
    }
}
