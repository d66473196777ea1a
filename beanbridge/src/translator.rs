//! 宿主 Bean 定义到消费方 Bean 的转换

use std::collections::BTreeSet;
use std::sync::Arc;

use beanbridge_consumer::annotations::{any, default_qualifier};
use beanbridge_consumer::BeanManager;
use beanbridge_host::{
    BeanDefinition, ConfigurableListableBeanFactory, FACTORY_BEAN_CLASS_NAME, OBJECT_TYPE_METHOD_NAME,
};
use beanbridge_reflect::{Class, ClassLoader};

use crate::descriptor::PublishedBean;
use crate::error::TranslateError;

/// 转换一个宿主 Bean
///
/// 1. 没有类名的 Bean 不发布
/// 2. 通过消费方的类加载器加载类
/// 3. 直接实现 FactoryBean 的类替换为其产品类型
/// 4. 计算类型闭包，收集限定符和构造型
pub fn translate(
    bean_name: &str,
    definition: &BeanDefinition,
    bean_factory: &Arc<dyn ConfigurableListableBeanFactory>,
    manager: &BeanManager,
) -> Result<PublishedBean, TranslateError> {
    let class_loader = manager.class_loader();

    let class_name = definition
        .bean_class_name
        .as_deref()
        .ok_or_else(|| TranslateError::NoClassName(bean_name.to_string()))?;

    let class = class_loader
        .load_class(class_name)
        .map_err(|_| TranslateError::ClassNotFound {
            bean_name: bean_name.to_string(),
            class_name: class_name.to_string(),
        })?;

    let bean_class = if implements_factory_bean(&class) {
        let product = product_class(bean_name, &class, &**class_loader)?;
        tracing::debug!(
            "Bean '{}' is a FactoryBean, publishing product type {}",
            bean_name,
            product.name()
        );
        product
    } else {
        class
    };

    let annotated_type =
        manager
            .create_annotated_type(&bean_class)
            .map_err(|source| TranslateError::Introspection {
                bean_name: bean_name.to_string(),
                class_name: bean_class.name().to_string(),
                source,
            })?;

    let mut qualifiers = BTreeSet::from([any(), default_qualifier()]);
    let mut stereotypes = BTreeSet::new();
    for annotation in annotated_type.annotations() {
        let kind = annotation.annotation_type();
        if manager.is_qualifier(kind) {
            qualifiers.insert(annotation.clone());
        }
        if manager.is_stereotype(kind) {
            stereotypes.insert(kind.clone());
        }
    }

    Ok(PublishedBean::new(
        bean_name,
        bean_class,
        annotated_type.type_closure().clone(),
        qualifiers,
        stereotypes,
        Arc::clone(bean_factory),
    ))
}

/// 只检查直接声明的接口；通过父类间接实现的不算
fn implements_factory_bean(class: &Class) -> bool {
    class
        .interfaces()
        .iter()
        .any(|interface| interface == FACTORY_BEAN_CLASS_NAME)
}

/// `object_type` 泛型返回类型的第一个实际类型参数
fn product_class(
    bean_name: &str,
    class: &Class,
    class_loader: &dyn ClassLoader,
) -> Result<Class, TranslateError> {
    let malformed = |reason: String| TranslateError::MalformedObjectType {
        bean_name: bean_name.to_string(),
        class_name: class.name().to_string(),
        reason,
    };

    let method = class
        .declared_method(OBJECT_TYPE_METHOD_NAME)
        .ok_or_else(|| TranslateError::MissingObjectType {
            bean_name: bean_name.to_string(),
            class_name: class.name().to_string(),
        })?;

    let return_type = method
        .generic_return_type()
        .map_err(|e| malformed(e.to_string()))?;

    let argument = return_type
        .actual_type_arguments()
        .and_then(|arguments| arguments.first())
        .ok_or_else(|| malformed(format!("return type {} has no type argument", return_type)))?;

    let product = argument
        .raw_name()
        .ok_or_else(|| malformed(format!("type argument {} names no class", argument)))?;

    class_loader
        .load_class(product)
        .map_err(|_| TranslateError::ProducedClassNotFound {
            bean_name: bean_name.to_string(),
            product: product.to_string(),
        })
}
