//! Vulkan implementation of [`FrameRenderer`]
//!
//! Per frame: wait for the slot's fence, acquire an image, record one render
//! pass (clear, bind, push the MVP, draw three vertices), submit and present.
//! The swapchain is rebuilt when the framebuffer size changes or when
//! acquisition/presentation reports it out of date.

use super::buffer::Buffer;
use super::commands::CommandPool;
use super::context::VulkanContext;
use super::pipeline::{Framebuffers, RenderPass, TrianglePipeline};
use super::shader::ShaderModule;
use super::swapchain::Swapchain;
use super::sync::{FrameSync, Semaphore};
use crate::app::Variant;
use crate::config::RenderConfig;
use crate::render::vertex::{AUXILIARY_TRIANGLE_POSITIONS, TRIANGLE_VERTICES};
use crate::render::{FrameOutcome, FrameRenderer, RenderError, RenderFrame, RenderResult};
use crate::window::{VulkanSurfaceSource, WindowBackend};
use ash::vk;

/// Triangle renderer
///
/// Fields drop top to bottom after [`Drop`] has waited for the device, so
/// everything created from the device goes before `context`.
pub struct VulkanRenderer {
    frames: Vec<FrameSync>,
    render_finished: Vec<Semaphore>,
    commands: CommandPool,
    framebuffers: Framebuffers,
    pipeline: TrianglePipeline,
    render_pass: RenderPass,
    vertex_shader: ShaderModule,
    fragment_shader: ShaderModule,
    vertex_buffer: Buffer,
    auxiliary_buffer: Option<Buffer>,
    swapchain: Swapchain,
    context: VulkanContext,
    built_for: (u32, u32),
    vsync: bool,
    current_frame: usize,
}

impl VulkanRenderer {
    /// Bring up Vulkan for `window`
    ///
    /// The buffered variant also uploads the auxiliary position buffer, which
    /// stays resident but is never bound.
    pub fn new<W>(window: &mut W, config: &RenderConfig, variant: Variant) -> RenderResult<Self>
    where
        W: VulkanSurfaceSource + WindowBackend,
    {
        log::info!("Initializing Vulkan renderer ({} variant)", variant);
        config.shaders.validate().map_err(RenderError::Shader)?;

        let context = VulkanContext::new(&mut *window, config)?;
        let device = context.raw_device();

        let built_for = window.framebuffer_size();
        let swapchain =
            Swapchain::new(&context, built_for, config.vsync, vk::SwapchainKHR::null())?;

        let vertex_shader =
            ShaderModule::from_file(device.clone(), &config.shaders.vertex_shader_path)?;
        let fragment_shader =
            ShaderModule::from_file(device.clone(), &config.shaders.fragment_shader_path)?;

        let render_pass = RenderPass::new(device.clone(), swapchain.format().format)?;
        let pipeline =
            TrianglePipeline::new(device.clone(), &render_pass, &vertex_shader, &fragment_shader)?;
        let framebuffers = Framebuffers::new(
            device.clone(),
            &render_pass,
            swapchain.image_views(),
            swapchain.extent(),
        )?;

        let physical_device = context.physical_device().device;
        let vertex_buffer = Buffer::new_static_vertex(
            device.clone(),
            context.instance(),
            physical_device,
            TRIANGLE_VERTICES.as_slice(),
        )?;

        let auxiliary_buffer = match variant {
            Variant::Immediate => None,
            Variant::Buffered => {
                let buffer = Buffer::new_static_vertex(
                    device.clone(),
                    context.instance(),
                    physical_device,
                    AUXILIARY_TRIANGLE_POSITIONS.as_slice(),
                )?;
                log::info!(
                    "Uploaded {}-byte auxiliary vertex buffer (static, never bound for drawing)",
                    buffer.size()
                );
                Some(buffer)
            }
        };

        let frame_count = config.max_frames_in_flight;
        let commands = CommandPool::new(device.clone(), context.queue_family(), frame_count)?;
        let frames = FrameSync::create_frames(&device, frame_count)?;
        let render_finished =
            Self::create_render_finished(&context, swapchain.image_views().len())?;

        log::info!("Vulkan renderer ready, {} frames in flight", frame_count);

        Ok(Self {
            frames,
            render_finished,
            commands,
            framebuffers,
            pipeline,
            render_pass,
            vertex_shader,
            fragment_shader,
            vertex_buffer,
            auxiliary_buffer,
            swapchain,
            context,
            built_for,
            vsync: config.vsync,
            current_frame: 0,
        })
    }

    fn create_render_finished(
        context: &VulkanContext,
        count: usize,
    ) -> RenderResult<Vec<Semaphore>> {
        (0..count).map(|_| Semaphore::new(context.raw_device())).collect()
    }

    /// Current swapchain extent
    pub const fn swapchain_extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    /// Whether the auxiliary buffer was uploaded
    pub const fn has_auxiliary_buffer(&self) -> bool {
        self.auxiliary_buffer.is_some()
    }

    fn rebuild_swapchain(&mut self, framebuffer: (u32, u32)) -> RenderResult<()> {
        self.context.wait_idle()?;
        let device = self.context.raw_device();

        let swapchain =
            Swapchain::new(&self.context, framebuffer, self.vsync, self.swapchain.handle())?;

        if swapchain.format().format != self.swapchain.format().format {
            log::info!(
                "Surface format changed {:?} -> {:?}, rebuilding pipeline",
                self.swapchain.format().format,
                swapchain.format().format
            );
            let render_pass = RenderPass::new(device.clone(), swapchain.format().format)?;
            let pipeline = TrianglePipeline::new(
                device.clone(),
                &render_pass,
                &self.vertex_shader,
                &self.fragment_shader,
            )?;
            self.pipeline = pipeline;
            self.render_pass = render_pass;
        }

        let framebuffers = Framebuffers::new(
            device,
            &self.render_pass,
            swapchain.image_views(),
            swapchain.extent(),
        )?;
        let render_finished =
            Self::create_render_finished(&self.context, swapchain.image_views().len())?;

        self.framebuffers = framebuffers;
        self.render_finished = render_finished;
        // The old swapchain is destroyed only after its replacement exists
        self.swapchain = swapchain;
        self.built_for = framebuffer;
        Ok(())
    }

    fn record(
        &self,
        command_buffer: vk::CommandBuffer,
        image_index: usize,
        frame: &RenderFrame,
    ) -> RenderResult<()> {
        let device = self.context.device();
        let extent = self.swapchain.extent();
        let framebuffer = self
            .framebuffers
            .get(image_index)
            .ok_or_else(|| RenderError::api("framebuffer lookup")(vk::Result::ERROR_UNKNOWN))?;

        let viewport = frame.geometry.viewport;
        #[allow(clippy::cast_precision_loss)]
        let viewports = [vk::Viewport {
            x: viewport.x as f32,
            y: viewport.y as f32,
            width: viewport.width as f32,
            height: viewport.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }];
        let scissors = [vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        }];
        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: frame.clear_color,
            },
        }];
        let mvp = frame.transform.vulkan_mvp();

        unsafe {
            device
                .reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(RenderError::api("command buffer reset"))?;

            let begin_info = vk::CommandBufferBeginInfo::builder()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
            device
                .begin_command_buffer(command_buffer, &begin_info)
                .map_err(RenderError::api("command buffer begin"))?;

            let render_pass_info = vk::RenderPassBeginInfo::builder()
                .render_pass(self.render_pass.handle())
                .framebuffer(framebuffer)
                .render_area(scissors[0])
                .clear_values(&clear_values);
            device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_info,
                vk::SubpassContents::INLINE,
            );

            device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline.handle(),
            );
            device.cmd_set_viewport(command_buffer, 0, &viewports);
            device.cmd_set_scissor(command_buffer, 0, &scissors);
            device.cmd_push_constants(
                command_buffer,
                self.pipeline.layout(),
                vk::ShaderStageFlags::VERTEX,
                0,
                bytemuck::cast_slice(mvp.as_slice()),
            );
            device.cmd_bind_vertex_buffers(command_buffer, 0, &[self.vertex_buffer.handle()], &[0]);
            device.cmd_draw(command_buffer, TRIANGLE_VERTICES.len() as u32, 1, 0, 0);

            device.cmd_end_render_pass(command_buffer);
            device
                .end_command_buffer(command_buffer)
                .map_err(RenderError::api("command buffer end"))?;
        }
        Ok(())
    }
}

impl FrameRenderer for VulkanRenderer {
    fn render(&mut self, frame: &RenderFrame) -> RenderResult<FrameOutcome> {
        let size = (frame.geometry.viewport.width, frame.geometry.viewport.height);
        if size != self.built_for {
            log::info!(
                "Framebuffer {}x{} -> {}x{}, rebuilding swapchain",
                self.built_for.0,
                self.built_for.1,
                size.0,
                size.1
            );
            self.rebuild_swapchain(size)?;
        }

        let slot = self.current_frame;
        self.frames[slot].in_flight.wait(u64::MAX)?;

        let acquired = unsafe {
            self.swapchain.loader().acquire_next_image(
                self.swapchain.handle(),
                u64::MAX,
                self.frames[slot].image_available.handle(),
                vk::Fence::null(),
            )
        };
        let image_index = match acquired {
            Ok((index, _suboptimal)) => index,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::warn!("Swapchain out of date during acquire, rebuilding");
                self.rebuild_swapchain(size)?;
                return Ok(FrameOutcome::SwapchainRebuilt);
            }
            Err(e) => return Err(RenderError::api("swapchain image acquisition")(e)),
        };

        // Only reset once work is certain to be submitted with this fence
        self.frames[slot].in_flight.reset()?;

        let command_buffer = self.commands.buffer(slot);
        self.record(command_buffer, image_index as usize, frame)?;

        let render_finished = self
            .render_finished
            .get(image_index as usize)
            .map(Semaphore::handle)
            .ok_or_else(|| RenderError::api("semaphore lookup")(vk::Result::ERROR_UNKNOWN))?;

        let wait_semaphores = [self.frames[slot].image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [command_buffer];
        let signal_semaphores = [render_finished];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores)
            .build();

        unsafe {
            self.context.device().queue_submit(
                self.context.queue(),
                &[submit_info],
                self.frames[slot].in_flight.handle(),
            )
        }
        .map_err(RenderError::api("queue submit"))?;

        let swapchains = [self.swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let presented =
            unsafe { self.swapchain.loader().queue_present(self.context.queue(), &present_info) };
        self.current_frame = (self.current_frame + 1) % self.frames.len();

        match presented {
            Ok(false) => Ok(FrameOutcome::Presented),
            Ok(true) => {
                log::debug!("Swapchain suboptimal after present, rebuilding");
                self.rebuild_swapchain(size)?;
                Ok(FrameOutcome::Presented)
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::warn!("Swapchain out of date during present, rebuilding");
                self.rebuild_swapchain(size)?;
                Ok(FrameOutcome::SwapchainRebuilt)
            }
            Err(e) => Err(RenderError::api("queue present")(e)),
        }
    }

    fn wait_idle(&mut self) -> RenderResult<()> {
        self.context.wait_idle()
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.context.wait_idle() {
            log::error!("Device wait failed during renderer teardown: {}", e);
        }
        log::debug!("Destroying Vulkan renderer");
    }
}
