//! Vulkan context management
//!
//! Loader, instance, surface, physical device and logical device. Each layer
//! is its own RAII type and [`VulkanContext`] declares them so they drop in
//! dependency order: device, surface, instance.

use crate::config::RenderConfig;
use crate::render::{RenderError, RenderResult};
use crate::window::VulkanSurfaceSource;
use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::{Surface, Swapchain as SwapchainLoader};
use ash::{vk, Device, Entry, Instance};
use std::ffi::{c_char, CStr, CString};

const VALIDATION_LAYER: &CStr =
    unsafe { CStr::from_bytes_with_nul_unchecked(b"VK_LAYER_KHRONOS_validation\0") };

/// Loader entry, instance and the optional validation messenger
pub struct VulkanInstance {
    /// Vulkan entry point
    pub entry: Entry,
    /// Vulkan instance handle
    pub instance: Instance,
    debug: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Load the Vulkan library and create an instance with the window's extensions
    ///
    /// A missing or broken loader surfaces as [`RenderError::LoaderUnavailable`].
    pub fn new(
        required_extensions: &[String],
        application_name: &str,
        enable_validation: bool,
    ) -> RenderResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| RenderError::LoaderUnavailable(e.to_string()))?;
        log::debug!("Vulkan loader initialized");

        let app_name = CString::new(application_name.replace('\0', "")).unwrap_or_default();
        let engine_name = CString::new("TriangleEngine").unwrap_or_default();
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let extension_names: Vec<CString> = required_extensions
            .iter()
            .filter_map(|ext| CString::new(ext.as_str()).ok())
            .collect();
        let mut extensions: Vec<*const c_char> =
            extension_names.iter().map(|ext| ext.as_ptr()).collect();

        let validation = enable_validation && Self::validation_layer_available(&entry);
        if enable_validation && !validation {
            log::warn!("Validation requested but VK_LAYER_KHRONOS_validation is not installed");
        }

        let mut layers: Vec<*const c_char> = Vec::new();
        if validation {
            layers.push(VALIDATION_LAYER.as_ptr());
            extensions.push(DebugUtils::name().as_ptr());
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layers);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(RenderError::api("instance creation"))?;

        let mut this = Self {
            entry,
            instance,
            debug: None,
        };

        if validation {
            let debug_utils = DebugUtils::new(&this.entry, &this.instance);
            let messenger = Self::setup_debug_messenger(&debug_utils)?;
            this.debug = Some((debug_utils, messenger));
            log::info!("Vulkan validation enabled");
        }

        Ok(this)
    }

    fn validation_layer_available(entry: &Entry) -> bool {
        #[allow(unused_unsafe)]
        let layers = unsafe { entry.enumerate_instance_layer_properties() }.unwrap_or_default();
        layers.iter().any(|layer| {
            let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
            name == VALIDATION_LAYER
        })
    }

    fn setup_debug_messenger(debug_utils: &DebugUtils) -> RenderResult<vk::DebugUtilsMessengerEXT> {
        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
            .map_err(RenderError::api("debug messenger creation"))
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some((debug_utils, messenger)) = self.debug.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
        log::debug!("Vulkan instance destroyed");
    }
}

/// Routes validation messages into the log
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}

/// Window surface with RAII cleanup
struct SurfaceHandle {
    loader: Surface,
    surface: vk::SurfaceKHR,
}

impl Drop for SurfaceHandle {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.surface, None);
        }
    }
}

/// Ranking used when several GPUs qualify; higher wins
pub const fn device_type_score(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 4,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 3,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 2,
        vk::PhysicalDeviceType::CPU => 1,
        _ => 0,
    }
}

/// Selected physical device and the queue family used for everything
pub struct PhysicalDeviceInfo {
    /// Vulkan physical device handle
    pub device: vk::PhysicalDevice,
    /// Device properties and limits
    pub properties: vk::PhysicalDeviceProperties,
    /// Queue family supporting both graphics and present
    pub queue_family: u32,
}

impl PhysicalDeviceInfo {
    /// Device name as reported by the driver
    pub fn name(&self) -> String {
        unsafe { CStr::from_ptr(self.properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    /// Pick the best GPU that can render and present to `surface`
    pub fn select(
        instance: &Instance,
        surface: vk::SurfaceKHR,
        surface_loader: &Surface,
    ) -> RenderResult<Self> {
        let devices = unsafe { instance.enumerate_physical_devices() }
            .map_err(RenderError::api("physical device enumeration"))?;

        if devices.is_empty() {
            return Err(RenderError::NoSuitableDevice("no Vulkan devices present".to_string()));
        }

        let selected = devices
            .into_iter()
            .filter_map(|device| Self::evaluate(instance, device, surface, surface_loader))
            .max_by_key(|info| device_type_score(info.properties.device_type))
            .ok_or_else(|| {
                RenderError::NoSuitableDevice(
                    "no device supports graphics, presentation and swapchains".to_string(),
                )
            })?;

        log::info!(
            "Selected GPU: {} ({:?})",
            selected.name(),
            selected.properties.device_type
        );
        Ok(selected)
    }

    fn evaluate(
        instance: &Instance,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        surface_loader: &Surface,
    ) -> Option<Self> {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(device) };

        let queue_family = queue_families.iter().enumerate().find_map(|(index, family)| {
            let index = u32::try_from(index).ok()?;
            let graphics = family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
            let present = unsafe {
                surface_loader.get_physical_device_surface_support(device, index, surface)
            }
            .unwrap_or(false);
            (graphics && present).then_some(index)
        })?;

        let extensions = unsafe { instance.enumerate_device_extension_properties(device) }.ok()?;
        let has_swapchain = extensions.iter().any(|ext| {
            let name = unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) };
            name == SwapchainLoader::name()
        });
        if !has_swapchain {
            return None;
        }

        Some(Self {
            device,
            properties,
            queue_family,
        })
    }
}

/// Logical device with its single queue
pub struct LogicalDevice {
    /// Vulkan logical device handle
    pub device: Device,
    /// Queue used for both graphics and presentation
    pub queue: vk::Queue,
    /// Swapchain extension loader
    pub swapchain_loader: SwapchainLoader,
}

impl LogicalDevice {
    /// Create the device with the swapchain extension and one queue
    pub fn new(instance: &Instance, physical_device: &PhysicalDeviceInfo) -> RenderResult<Self> {
        let priorities = [1.0_f32];
        let queue_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(physical_device.queue_family)
            .queue_priorities(&priorities);
        let extensions = [SwapchainLoader::name().as_ptr()];

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(std::slice::from_ref(&queue_info))
            .enabled_extension_names(&extensions);

        let device = unsafe { instance.create_device(physical_device.device, &create_info, None) }
            .map_err(RenderError::api("logical device creation"))?;
        let queue = unsafe { device.get_device_queue(physical_device.queue_family, 0) };
        let swapchain_loader = SwapchainLoader::new(instance, &device);

        Ok(Self {
            device,
            queue,
            swapchain_loader,
        })
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
    }
}

/// Everything between the loader and the swapchain
pub struct VulkanContext {
    device: LogicalDevice,
    physical_device: PhysicalDeviceInfo,
    surface: SurfaceHandle,
    instance: VulkanInstance,
}

impl VulkanContext {
    /// Create instance, surface and device for `window`
    pub fn new(window: &mut impl VulkanSurfaceSource, config: &RenderConfig) -> RenderResult<Self> {
        let required_extensions = window.required_instance_extensions()?;
        log::debug!("Required instance extensions: {:?}", required_extensions);

        let instance = VulkanInstance::new(
            &required_extensions,
            &config.application_name,
            config.validation_enabled(),
        )?;

        let surface = SurfaceHandle {
            loader: Surface::new(&instance.entry, &instance.instance),
            surface: window.create_surface(instance.instance.handle())?,
        };

        let physical_device =
            PhysicalDeviceInfo::select(&instance.instance, surface.surface, &surface.loader)?;
        let device = LogicalDevice::new(&instance.instance, &physical_device)?;

        Ok(Self {
            device,
            physical_device,
            surface,
            instance,
        })
    }

    /// Get the Vulkan instance
    pub const fn instance(&self) -> &Instance {
        &self.instance.instance
    }

    /// Get the surface handle
    pub const fn surface(&self) -> vk::SurfaceKHR {
        self.surface.surface
    }

    /// Get the surface loader
    pub const fn surface_loader(&self) -> &Surface {
        &self.surface.loader
    }

    /// Get the physical device info
    pub const fn physical_device(&self) -> &PhysicalDeviceInfo {
        &self.physical_device
    }

    /// Get the logical device
    pub const fn device(&self) -> &Device {
        &self.device.device
    }

    /// Clone of the device handle for RAII wrappers
    pub fn raw_device(&self) -> Device {
        self.device.device.clone()
    }

    /// Get the swapchain loader
    pub const fn swapchain_loader(&self) -> &SwapchainLoader {
        &self.device.swapchain_loader
    }

    /// Queue used for submission and presentation
    pub const fn queue(&self) -> vk::Queue {
        self.device.queue
    }

    /// Index of the queue family behind [`queue`](Self::queue)
    pub const fn queue_family(&self) -> u32 {
        self.physical_device.queue_family
    }

    /// Block until the device has finished all work
    pub fn wait_idle(&self) -> RenderResult<()> {
        unsafe { self.device.device.device_wait_idle() }
            .map_err(RenderError::api("device wait idle"))
    }
}
