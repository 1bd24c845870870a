//! Annotation-driven JMS listener infrastructure

use activation_types::Phase;

use crate::condition::Condition;
use crate::module::ModuleDescriptor;

pub const ANNOTATION_TYPE: &str = "org.springframework.jms.annotation.EnableJms";
pub const CONNECTION_FACTORY_TYPE: &str = "javax.jms.ConnectionFactory";
pub const DESTINATION_RESOLVER_TYPE: &str = "org.springframework.jms.support.destination.DestinationResolver";

const CONFIGURER_TYPE: &str =
    "org.springframework.boot.autoconfigure.jms.DefaultJmsListenerContainerFactoryConfigurer";

pub const CONFIGURER_MODULE: &str = "jms-listener-configurer";
pub const ANNOTATION_MODULE: &str = "jms-annotation-processing";
pub const CONTAINER_FACTORY_MODULE: &str = "jms-listener-container-factory";
pub const JNDI_RESOLVER_MODULE: &str = "jms-jndi-destination-resolver";

pub fn modules() -> Vec<ModuleDescriptor> {
    let on_type_path = Condition::type_available(ANNOTATION_TYPE);

    vec![
        ModuleDescriptor::builder(CONFIGURER_MODULE)
            .condition(on_type_path.clone())
            .condition(Condition::component_of_type_absent(CONFIGURER_TYPE))
            .provides("jmsListenerContainerFactoryConfigurer", CONFIGURER_TYPE)
            .build(),
        ModuleDescriptor::builder(ANNOTATION_MODULE)
            .condition(on_type_path.clone())
            .condition(Condition::component_absent("jmsListenerAnnotationProcessor"))
            .provides(
                "jmsListenerAnnotationProcessor",
                "org.springframework.jms.annotation.JmsListenerAnnotationBeanPostProcessor",
            )
            .build(),
        // Connection factories are often registered as singletons by other
        // modules, so the candidate check waits for instantiation.
        ModuleDescriptor::builder(CONTAINER_FACTORY_MODULE)
            .phase(Phase::Instantiation)
            .runs_after(CONFIGURER_MODULE)
            .condition(on_type_path.clone())
            .condition(Condition::single_candidate(CONNECTION_FACTORY_TYPE))
            .condition(Condition::component_absent("jmsListenerContainerFactory"))
            .provides(
                "jmsListenerContainerFactory",
                "org.springframework.jms.config.DefaultJmsListenerContainerFactory",
            )
            .build(),
        ModuleDescriptor::builder(JNDI_RESOLVER_MODULE)
            .condition(on_type_path)
            .condition(Condition::external_capability("jndi"))
            .condition(Condition::component_of_type_absent(DESTINATION_RESOLVER_TYPE))
            .provides(
                "destinationResolver",
                "org.springframework.jms.support.destination.JndiDestinationResolver",
            )
            .build(),
    ]
}
