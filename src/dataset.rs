/// This module provides access to the CIFAR-10 image dataset (binary distribution)
pub mod cifar10;
