pub use crate::dataset::cifar10::{
    CIFAR10_CLASS_NAMES, Cifar10, Split, load_cifar10, parse_cifar10_records,
};
